// Performance-focused tests for trie scalability
//
// These tests check that lookup cost follows path length rather than the
// number of registered patterns.

use super::Trie;
use std::time::Instant;

#[test]
fn test_trie_performance_with_many_routes() {
    let mut trie = Trie::new();
    for i in 0..500 {
        trie.define(&format!("/api/v1/resource{}/:id", i))
            .unwrap()
            .attach_handler("GET", format!("handler_{}", i))
            .unwrap();
    }

    let start = Instant::now();
    for _ in 0..1000 {
        let result = trie.match_path("/api/v1/resource250/123").unwrap();
        assert!(result.is_match());
    }
    let duration = start.elapsed();

    assert!(
        duration.as_millis() < 50,
        "Trie performance degraded: {}ms for 1000 lookups with 500 routes",
        duration.as_millis()
    );
}

#[test]
fn test_lookup_cost_independent_of_route_count() {
    fn time_lookups(route_count: usize) -> u128 {
        let mut trie: Trie<usize> = Trie::new();
        for i in 0..route_count {
            trie.define(&format!("/svc{}/items/:id", i)).unwrap();
        }
        trie.define("/target/items/:id").unwrap();

        let start = Instant::now();
        for _ in 0..2000 {
            assert!(trie.match_path("/target/items/42").unwrap().is_match());
        }
        start.elapsed().as_micros()
    }

    let small = time_lookups(10);
    let large = time_lookups(2000);

    // Hash lookups per fragment: a 200x larger table must not be 20x slower
    assert!(
        large < small.saturating_mul(20).max(5_000),
        "lookup time grew with route count: {}us vs {}us",
        large,
        small
    );
}

#[test]
fn test_deep_patterns_define_without_recursion() {
    let depth = 1_000;
    let pattern: String = (0..depth).map(|i| format!("/s{}", i)).collect();

    let mut trie: Trie<()> = Trie::new();
    trie.define(&pattern).unwrap();

    let result = trie.match_path(&pattern).unwrap();
    assert_eq!(result.node().map(|n| n.pattern().len()), Some(pattern.len()));
}

#[test]
fn test_inline_params_stay_on_stack() {
    let mut trie: Trie<()> = Trie::new();
    trie.define("/:a/:b/:c/:d/:e/:f/:g/:h").unwrap();

    let result = trie.match_path("/1/2/3/4/5/6/7/8").unwrap();
    let m = result.into_route_match().unwrap();
    assert_eq!(m.params.len(), super::MAX_INLINE_PARAMS);
    assert!(!m.params.spilled());
}
