use super::cache::{ExistenceCache, PathCache, SourceCache};
use super::test_host::MemoryHost;
use tsb_common::ByteOrderMark;

#[test]
fn source_cache_reads_each_file_once() {
    let host = MemoryHost::new("/work");
    host.add_file("/work/a.ts", "let a = 1;");
    let cache = SourceCache::default();

    let first = cache.get_or_read(&host, "/work/a.ts");
    let second = cache.get_or_read(&host, "/work/a.ts");

    assert_eq!(&*first.text, "let a = 1;");
    assert_eq!(first, second);
    assert_eq!(host.read_count("/work/a.ts"), 1);
}

#[test]
fn source_cache_keeps_first_observed_text() {
    let host = MemoryHost::new("/work");
    host.add_file("/work/a.ts", "old");
    let cache = SourceCache::default();
    cache.get_or_read(&host, "/work/a.ts");

    host.add_file("/work/a.ts", "new");

    assert_eq!(&*cache.get_or_read(&host, "/work/a.ts").text, "old");
}

#[test]
fn source_cache_remembers_byte_order_mark() {
    let host = MemoryHost::new("/work");
    host.add_file_with_bom("/work/a.ts", "x", ByteOrderMark::Utf16LittleEndian);
    let cache = SourceCache::default();

    let record = cache.get_or_read(&host, "/work/a.ts");
    assert_eq!(record.byte_order_mark, ByteOrderMark::Utf16LittleEndian);
}

#[test]
fn unreadable_source_is_cached_as_empty_text() {
    let host = MemoryHost::new("/work");
    host.add_file("/work/locked.ts", "secret");
    host.make_unreadable("/work/locked.ts");
    let cache = SourceCache::default();

    let record = cache.get_or_read(&host, "/work/locked.ts");
    assert_eq!(&*record.text, "");
    assert_eq!(record.byte_order_mark, ByteOrderMark::None);

    cache.get_or_read(&host, "/work/locked.ts");
    assert_eq!(host.read_count("/work/locked.ts"), 1);
}

#[test]
fn path_cache_resolves_against_cwd() {
    let host = MemoryHost::new("/work");
    let cache = PathCache::default();

    assert_eq!(cache.resolve(&host, "a/../b/x.ts"), "/work/b/x.ts");
    assert_eq!(cache.resolve(&host, "a/../b/x.ts"), "/work/b/x.ts");
    assert_eq!(cache.resolve(&host, "/abs/y.ts"), "/abs/y.ts");
    assert_eq!(cache.resolve(&host, "./c//z.ts"), "/work/c/z.ts");
}

#[test]
fn existence_cache_never_revisits_a_path() {
    let host = MemoryHost::new("/work");
    let cache = ExistenceCache::default();

    assert!(!cache.file_exists(&host, "/work/late.ts"));
    host.add_file("/work/late.ts", "");

    // The negative answer sticks for the rest of the run.
    assert!(!cache.file_exists(&host, "/work/late.ts"));
    assert!(ExistenceCache::default().file_exists(&host, "/work/late.ts"));
}
