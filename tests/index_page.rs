//! Checks on the served index page.

const INDEX: &str = include_str!("../templates/index.html");

#[test]
fn player_names_are_set_as_text() {
    assert!(!INDEX.contains("innerHTML"));
    assert!(INDEX.contains("node.textContent = text"));
    assert!(INDEX.contains("slot.entry.display_name"));
    assert!(INDEX.contains("el(\"span\", \"winner\", n.winner.display_name)"));
}
