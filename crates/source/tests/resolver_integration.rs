//! 소스 -> resolver 통합 테스트
//!
//! 실제 디렉토리 트리를 인덱싱하고 제외 데코레이터를 겹쳐 질의 계약을 검증합니다.

use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use strata_source::{
    ExcludingResolver, Location, MockResolver, Resolver, Source, SourceError, exclude_globs,
};

fn write(root: &Path, rel: &str, body: &str) {
    let path = root.join(rel);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, body).unwrap();
}

fn sorted_paths(locations: Vec<Location>) -> Vec<String> {
    let mut paths: Vec<String> = locations
        .iter()
        .map(|l| l.real_path().to_owned())
        .collect();
    paths.sort();
    paths
}

fn fixture_tree() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "app/go.mod", "module github.com/x/y\n");
    write(dir.path(), "app/package-lock.json", "{}\n");
    write(dir.path(), "vendor/lib/go.sum", "github.com/x/y v1.2.3 h1:abc=\n");
    write(dir.path(), "node_modules/left-pad/package.json", "{}\n");
    dir
}

// ─── 디렉토리 소스 ─────────────────────────────────────────────────

#[test]
fn directory_source_answers_every_query_shape() {
    let dir = fixture_tree();
    let resolver = Source::detect(dir.path()).unwrap().resolver().unwrap();

    assert_eq!(
        sorted_paths(resolver.files_by_path(&["/app/go.mod"]).unwrap()),
        vec!["/app/go.mod"]
    );
    assert_eq!(
        sorted_paths(resolver.files_by_glob(&["**/go.*"]).unwrap()),
        vec!["/app/go.mod", "/vendor/lib/go.sum"]
    );
    assert_eq!(
        sorted_paths(resolver.files_by_basename(&["package.json"]).unwrap()),
        vec!["/node_modules/left-pad/package.json"]
    );
    assert_eq!(
        sorted_paths(resolver.files_by_extension(&[".json"]).unwrap()),
        vec!["/app/package-lock.json", "/node_modules/left-pad/package.json"]
    );
    assert_eq!(
        sorted_paths(resolver.files_by_basename_glob(&["package*.json"]).unwrap()),
        vec!["/app/package-lock.json", "/node_modules/left-pad/package.json"]
    );
    assert_eq!(resolver.files_by_mime_type(&["text/plain"]).unwrap().len(), 4);
}

#[test]
fn directory_contents_are_exact_bytes() {
    let dir = fixture_tree();
    let resolver = Source::detect(dir.path()).unwrap().resolver().unwrap();
    let loc = resolver.files_by_path(&["/vendor/lib/go.sum"]).unwrap().remove(0);

    let mut body = String::new();
    resolver
        .file_contents_by_location(&loc)
        .unwrap()
        .read_to_string(&mut body)
        .unwrap();
    assert_eq!(body, "github.com/x/y v1.2.3 h1:abc=\n");

    let md = resolver.file_metadata_by_location(&loc).unwrap();
    assert!(md.is_regular());
    assert_eq!(md.size, body.len() as u64);
}

#[test]
fn all_locations_is_restartable_by_calling_again() {
    let dir = fixture_tree();
    let resolver = Source::detect(dir.path()).unwrap().resolver().unwrap();
    let first = resolver.all_locations().count();
    let second = resolver.all_locations().count();
    assert_eq!(first, 4);
    assert_eq!(first, second);
}

#[test]
fn early_break_from_all_locations_terminates() {
    let dir = tempfile::tempdir().unwrap();
    for i in 0..500 {
        write(dir.path(), &format!("files/f{i:04}.txt"), "x");
    }
    let resolver = Source::detect(dir.path()).unwrap().resolver().unwrap();
    let taken: Vec<Location> = resolver.all_locations().take(3).collect();
    assert_eq!(taken.len(), 3);
}

// ─── 제외 ─────────────────────────────────────────────────────────

#[test]
fn exclusion_is_indistinguishable_from_absence() {
    let inner = MockResolver::from_paths(&["/a", "/b", "/c"]);
    let resolver = ExcludingResolver::new(inner.clone(), Arc::new(|p: &str| p == "/b"));
    let expected = vec!["/a".to_owned(), "/c".to_owned()];

    assert_eq!(
        sorted_paths(resolver.files_by_path(&["/a", "/b", "/c"]).unwrap()),
        expected
    );
    assert_eq!(sorted_paths(resolver.files_by_glob(&["**/*"]).unwrap()), expected);
    assert_eq!(
        sorted_paths(resolver.files_by_mime_type(&["text/plain"]).unwrap()),
        expected
    );
    assert_eq!(sorted_paths(resolver.all_locations().collect()), expected);

    let b = Location::new("/b");
    assert!(inner.has_path("/b"));
    assert!(inner.file_contents_by_location(&b).is_ok());
    assert!(!resolver.has_path("/b"));
    assert!(matches!(
        resolver.file_contents_by_location(&b),
        Err(SourceError::NotFound { .. })
    ));
    assert!(matches!(
        resolver.file_metadata_by_location(&b),
        Err(SourceError::NotFound { .. })
    ));
}

#[test]
fn stacked_exclusions_compose() {
    let inner = MockResolver::from_paths(&["/a", "/b", "/c"]);
    let once = ExcludingResolver::new(inner, Arc::new(|p: &str| p == "/a"));
    let twice = ExcludingResolver::new(once, Arc::new(|p: &str| p == "/c"));
    assert_eq!(sorted_paths(twice.all_locations().collect()), vec!["/b"]);
    assert!(!twice.has_path("/a"));
    assert!(twice.has_path("/b"));
}

#[test]
fn glob_exclusions_on_directory_source() {
    let dir = fixture_tree();
    let source = Source::detect(dir.path()).unwrap();
    let exclude = exclude_globs(&["**/node_modules/**".to_owned()]).unwrap();
    let resolver = ExcludingResolver::new(source.resolver().unwrap(), exclude);

    assert!(
        resolver
            .files_by_basename(&["package.json"])
            .unwrap()
            .is_empty()
    );
    assert_eq!(resolver.all_locations().count(), 3);
}

#[test]
fn shared_resolver_is_usable_from_many_threads() {
    let dir = fixture_tree();
    let resolver: Arc<dyn Resolver> = Source::detect(dir.path())
        .unwrap()
        .excluding_resolver(&[])
        .unwrap();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let r = Arc::clone(&resolver);
            std::thread::spawn(move || r.files_by_glob(&["**/*.json"]).unwrap().len())
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), 2);
    }
}
