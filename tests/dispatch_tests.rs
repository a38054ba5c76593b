use pathtrie::dispatch::{resolve, Resolution};
use pathtrie::{RouteTable, Trie};

fn pet_store() -> Trie<String> {
    RouteTable::from_toml_str(
        r#"
[[routes]]
pattern = "/pets"
handlers = { GET = "list_pets", POST = "add_pet" }

[[routes]]
pattern = "/pets/:id"
handlers = { GET = "get_pet" }

[[routes]]
pattern = "/users/:user_id/posts/"
handlers = { GET = "list_user_posts" }

[[routes]]
pattern = "/admin/settings"
"#,
    )
    .unwrap()
    .build_trie()
    .unwrap()
}

fn status(trie: &Trie<String>, method: &str, path: &str) -> u16 {
    resolve(trie.match_path(path).unwrap(), method).status()
}

#[test]
fn test_dispatch_decision_table() {
    let trie = pet_store();
    let cases = [
        ("GET", "/pets", 200),
        ("POST", "/pets", 200),
        ("GET", "/pets/42", 200),
        ("DELETE", "/pets/42", 405),
        ("GET", "/admin/settings", 501),
        ("GET", "/pets/42/", 301),
        ("POST", "/pets/", 307),
        ("GET", "//pets", 301),
        ("GET", "/users/7/posts", 301),
        ("GET", "/users/7/posts/", 200),
        ("GET", "/does/not/exist", 404),
    ];
    for (method, path, expected) in cases {
        assert_eq!(
            status(&trie, method, path),
            expected,
            "Status mismatch for {} {}",
            method,
            path
        );
    }
}

#[test]
fn test_handler_and_params_reach_dispatcher() {
    let trie = pet_store();
    match resolve(trie.match_path("/pets/42").unwrap(), "GET") {
        Resolution::Handler { handler, route } => {
            assert_eq!(handler, "get_pet");
            assert_eq!(route.get_param("id"), Some("42"));
            assert_eq!(route.pattern(), "/pets/:id");
        }
        other => panic!("unexpected status {}", other.status()),
    }
}

#[test]
fn test_allow_header_lists_registered_methods() {
    let trie = pet_store();
    let resolution = resolve(trie.match_path("/pets").unwrap(), "DELETE");
    assert_eq!(resolution.allow(), Some("GET, POST"));
}

#[test]
fn test_redirect_locations() {
    let trie = pet_store();
    match resolve(trie.match_path("/users/7/posts").unwrap(), "GET") {
        Resolution::Redirect { location, status } => {
            assert_eq!(location, "/users/7/posts/");
            assert_eq!(status, 301);
        }
        other => panic!("unexpected status {}", other.status()),
    }
    match resolve(trie.match_path("/pets//42/").unwrap(), "PUT") {
        Resolution::Redirect { location, status } => {
            assert_eq!(location, "/pets/42");
            assert_eq!(status, 307);
        }
        other => panic!("unexpected status {}", other.status()),
    }
}
