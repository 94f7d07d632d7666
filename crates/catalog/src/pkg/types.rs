//! 패키지 종류와 언어
//!
//! [`PackageType`]은 생태계 안의 패키지 형식(예: `go-module`, `rpm`)이며,
//! PURL 타입과 양방향으로 대응됩니다.

use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// 패키지 종류
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
    JsonSchema,
)]
pub enum PackageType {
    /// 알 수 없는 패키지
    #[default]
    #[serde(rename = "UnknownPackage")]
    Unknown,
    /// Arch Linux
    #[serde(rename = "alpm")]
    Alpm,
    /// Alpine
    #[serde(rename = "apk")]
    Apk,
    /// 바이너리에서 식별한 패키지
    #[serde(rename = "binary")]
    Binary,
    /// CocoaPods
    #[serde(rename = "pod")]
    Cocoapods,
    /// Conan (C/C++)
    #[serde(rename = "conan")]
    Conan,
    /// Dart pub
    #[serde(rename = "dart-pub")]
    DartPub,
    /// Debian
    #[serde(rename = "deb")]
    Deb,
    /// .NET
    #[serde(rename = "dotnet")]
    Dotnet,
    /// Ruby gem
    #[serde(rename = "gem")]
    Gem,
    /// Go 모듈
    #[serde(rename = "go-module")]
    GoModule,
    /// GraalVM native image
    #[serde(rename = "graalvm-native-image")]
    GraalVmNativeImage,
    /// Haskell
    #[serde(rename = "hackage")]
    Hackage,
    /// Erlang/Elixir hex
    #[serde(rename = "hex")]
    Hex,
    /// Java 아카이브
    #[serde(rename = "java-archive")]
    JavaArchive,
    /// Jenkins 플러그인
    #[serde(rename = "jenkins-plugin")]
    JenkinsPlugin,
    /// Microsoft KB
    #[serde(rename = "msrc-kb")]
    MsrcKb,
    /// Nix
    #[serde(rename = "nix")]
    Nix,
    /// npm
    #[serde(rename = "npm")]
    Npm,
    /// PHP composer
    #[serde(rename = "php-composer")]
    PhpComposer,
    /// Gentoo portage
    #[serde(rename = "portage")]
    Portage,
    /// Python
    #[serde(rename = "python")]
    Python,
    /// RPM
    #[serde(rename = "rpm")]
    Rpm,
    /// Rust crate
    #[serde(rename = "rust-crate")]
    RustCrate,
}

impl PackageType {
    /// 알려진 모든 패키지 종류 (`Unknown` 제외)
    pub const ALL: &'static [PackageType] = &[
        Self::Alpm,
        Self::Apk,
        Self::Binary,
        Self::Cocoapods,
        Self::Conan,
        Self::DartPub,
        Self::Deb,
        Self::Dotnet,
        Self::Gem,
        Self::GoModule,
        Self::GraalVmNativeImage,
        Self::Hackage,
        Self::Hex,
        Self::JavaArchive,
        Self::JenkinsPlugin,
        Self::MsrcKb,
        Self::Nix,
        Self::Npm,
        Self::PhpComposer,
        Self::Portage,
        Self::Python,
        Self::Rpm,
        Self::RustCrate,
    ];

    /// 직렬화 문자열
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unknown => "UnknownPackage",
            Self::Alpm => "alpm",
            Self::Apk => "apk",
            Self::Binary => "binary",
            Self::Cocoapods => "pod",
            Self::Conan => "conan",
            Self::DartPub => "dart-pub",
            Self::Deb => "deb",
            Self::Dotnet => "dotnet",
            Self::Gem => "gem",
            Self::GoModule => "go-module",
            Self::GraalVmNativeImage => "graalvm-native-image",
            Self::Hackage => "hackage",
            Self::Hex => "hex",
            Self::JavaArchive => "java-archive",
            Self::JenkinsPlugin => "jenkins-plugin",
            Self::MsrcKb => "msrc-kb",
            Self::Nix => "nix",
            Self::Npm => "npm",
            Self::PhpComposer => "php-composer",
            Self::Portage => "portage",
            Self::Python => "python",
            Self::Rpm => "rpm",
            Self::RustCrate => "rust-crate",
        }
    }

    /// 대응하는 PURL 타입. 대응이 없으면 빈 문자열입니다.
    pub fn purl_type(&self) -> &'static str {
        match self {
            Self::Alpm => "alpm",
            Self::Apk => "apk",
            Self::Cocoapods => "cocoapods",
            Self::Conan => "conan",
            Self::DartPub => "pub",
            Self::Deb => "deb",
            Self::Dotnet => "nuget",
            Self::Gem => "gem",
            Self::Hex => "hex",
            Self::GoModule => "golang",
            Self::Hackage => "hackage",
            Self::JavaArchive | Self::JenkinsPlugin => "maven",
            Self::PhpComposer => "composer",
            Self::Python => "pypi",
            Self::Portage => "portage",
            Self::Nix => "nix",
            Self::Npm => "npm",
            Self::Rpm => "rpm",
            Self::RustCrate => "cargo",
            Self::Unknown | Self::Binary | Self::GraalVmNativeImage | Self::MsrcKb => "",
        }
    }

    /// PURL 타입 이름으로 패키지 종류를 찾습니다.
    pub fn from_purl_type(name: &str) -> Self {
        match name {
            "deb" => Self::Deb,
            "rpm" => Self::Rpm,
            "alpm" => Self::Alpm,
            "apk" | "alpine" => Self::Apk,
            "maven" => Self::JavaArchive,
            "composer" => Self::PhpComposer,
            "golang" => Self::GoModule,
            "npm" => Self::Npm,
            "pypi" => Self::Python,
            "gem" => Self::Gem,
            "cargo" | "crate" => Self::RustCrate,
            "pub" => Self::DartPub,
            "nuget" => Self::Dotnet,
            "cocoapods" => Self::Cocoapods,
            "conan" => Self::Conan,
            "hackage" => Self::Hackage,
            "portage" => Self::Portage,
            "hex" => Self::Hex,
            "nix" => Self::Nix,
            _ => Self::Unknown,
        }
    }

    /// PURL 문자열(`pkg:<type>/...`)에서 패키지 종류를 찾습니다.
    pub fn from_purl(purl: &str) -> Self {
        purl.strip_prefix("pkg:")
            .and_then(|rest| rest.split_once('/'))
            .map(|(ty, _)| Self::from_purl_type(&ty.to_ascii_lowercase()))
            .unwrap_or(Self::Unknown)
    }
}

impl fmt::Display for PackageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 패키지 언어
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
    JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// 언어 없음 (OS 패키지 등)
    #[default]
    #[serde(rename = "")]
    Unknown,
    /// C/C++
    Cpp,
    /// Dart
    Dart,
    /// .NET
    Dotnet,
    /// Elixir
    Elixir,
    /// Erlang
    Erlang,
    /// Go
    Go,
    /// Haskell
    Haskell,
    /// Java
    Java,
    /// JavaScript
    Javascript,
    /// PHP
    Php,
    /// Python
    Python,
    /// Ruby
    Ruby,
    /// Rust
    Rust,
    /// Swift
    Swift,
}

impl Language {
    /// 직렬화 문자열
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unknown => "",
            Self::Cpp => "cpp",
            Self::Dart => "dart",
            Self::Dotnet => "dotnet",
            Self::Elixir => "elixir",
            Self::Erlang => "erlang",
            Self::Go => "go",
            Self::Haskell => "haskell",
            Self::Java => "java",
            Self::Javascript => "javascript",
            Self::Php => "php",
            Self::Python => "python",
            Self::Ruby => "ruby",
            Self::Rust => "rust",
            Self::Swift => "swift",
        }
    }

    /// 패키지 종류에서 언어를 추정합니다.
    pub fn from_package_type(ty: PackageType) -> Self {
        match ty {
            PackageType::GoModule => Self::Go,
            PackageType::RustCrate => Self::Rust,
            PackageType::Npm => Self::Javascript,
            PackageType::Python => Self::Python,
            PackageType::JavaArchive | PackageType::JenkinsPlugin => Self::Java,
            PackageType::Gem => Self::Ruby,
            PackageType::PhpComposer => Self::Php,
            PackageType::DartPub => Self::Dart,
            PackageType::Dotnet => Self::Dotnet,
            PackageType::Cocoapods => Self::Swift,
            PackageType::Conan => Self::Cpp,
            PackageType::Hackage => Self::Haskell,
            PackageType::Hex => Self::Erlang,
            _ => Self::Unknown,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
