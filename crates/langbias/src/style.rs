/// Stylesheet for the page, including the reveal transition rules.
pub const STYLESHEET: &str = include_str!("../assets/page.css");

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reveal::{REVEAL_CLASS, REVEALED_CLASS};

    #[test]
    fn stylesheet_covers_reveal_classes() {
        assert!(STYLESHEET.contains(&format!(".{REVEAL_CLASS} {{")));
        assert!(STYLESHEET.contains(&format!(".{REVEAL_CLASS}.{REVEALED_CLASS} {{")));
    }
}
