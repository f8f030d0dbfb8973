use crate::selectors::SelectorCandidate;
use anyhow::Result;

/// Minimal view of the live page, just enough for the strategy lists to run.
/// Implemented by the real Chrome tab and by synthetic fixtures in tests, so
/// the selector-resolution logic never needs a browser to be exercised.
pub trait Dom {
    /// True if at least one element matching `css` is visible.
    fn is_visible(&self, css: &str) -> Result<bool>;

    /// True if a matching element is visible, inside the viewport and not
    /// disabled.
    fn is_clickable(&self, css: &str) -> Result<bool>;

    /// Trimmed text of the first visible matching element with non-empty
    /// text.
    fn visible_text(&self, css: &str) -> Result<Option<String>>;

    /// Replaces the content of the first matching input (select-all, then
    /// overwrite).
    fn fill(&self, css: &str, value: &str) -> Result<()>;

    /// Native click on the first matching element.
    fn click(&self, css: &str) -> Result<()>;

    /// Script-dispatched click on the same element, the fallback when the
    /// native click fails.
    fn click_via_script(&self, css: &str) -> Result<()>;

    /// Trimmed labels of visible, enabled buttons in document order,
    /// optionally restricted to elements inside `scope` containers. Each
    /// enumerated button is addressable afterwards as
    /// `[data-pb-idx="<position>"]`.
    fn button_labels(&self, scope: Option<&str>) -> Result<Vec<String>>;

    /// Current page URL.
    fn url(&self) -> String;

    /// Current document title.
    fn title(&self) -> Result<String>;
}

/// Selector for a button enumerated by `Dom::button_labels`.
pub fn indexed_button(index: usize) -> String {
    format!("[data-pb-idx=\"{}\"]", index)
}

/// First candidate with a visible match.
pub fn first_visible<'a>(
    dom: &dyn Dom,
    candidates: &'a [SelectorCandidate],
) -> Result<Option<&'a SelectorCandidate>> {
    for candidate in candidates {
        if dom.is_visible(candidate.css)? {
            return Ok(Some(candidate));
        }
    }
    Ok(None)
}

/// First candidate with a visible, enabled, in-viewport match.
pub fn first_clickable<'a>(
    dom: &dyn Dom,
    candidates: &'a [SelectorCandidate],
) -> Result<Option<&'a SelectorCandidate>> {
    for candidate in candidates {
        if dom.is_clickable(candidate.css)? {
            return Ok(Some(candidate));
        }
    }
    Ok(None)
}

/// Index of the first label containing a keyword; keyword order is priority
/// order, so an earlier keyword beats an earlier button.
pub fn pick_by_keyword(labels: &[String], keywords: &[&str]) -> Option<usize> {
    for keyword in keywords {
        if let Some(index) = labels
            .iter()
            .position(|label| label.trim().to_lowercase().contains(keyword))
        {
            return Some(index);
        }
    }
    None
}

/// First non-empty visible text among the candidates.
pub fn first_error_text(
    dom: &dyn Dom,
    candidates: &[SelectorCandidate],
) -> Result<Option<String>> {
    for candidate in candidates {
        if let Some(text) = dom.visible_text(candidate.css)? {
            let text = text.trim();
            if !text.is_empty() {
                return Ok(Some(text.to_string()));
            }
        }
    }
    Ok(None)
}


#[cfg(test)]
mod tests {
    use super::fixtures::{FakeDom, FakeElement};
    use super::*;
    use crate::selectors::{CONFIRM_KEYWORDS, ERROR_BANNERS};

    #[test]
    fn keyword_order_beats_document_order() {
        let labels = vec![
            "Cancel".to_string(),
            "Submit request".to_string(),
            "Confirm booking".to_string(),
        ];
        // "confirm" outranks "submit" even though the submit button comes first.
        assert_eq!(pick_by_keyword(&labels, CONFIRM_KEYWORDS), Some(2));
    }

    #[test]
    fn keyword_match_is_case_insensitive_and_trimmed() {
        let labels = vec!["  BOOK NOW  ".to_string()];
        assert_eq!(pick_by_keyword(&labels, CONFIRM_KEYWORDS), Some(0));
    }

    #[test]
    fn no_keyword_match_yields_none() {
        let labels = vec!["Cancel".to_string(), "Back".to_string()];
        assert_eq!(pick_by_keyword(&labels, CONFIRM_KEYWORDS), None);
    }

    #[test]
    fn first_visible_respects_candidate_order() {
        let dom = FakeDom::default()
            .element("#b", FakeElement::visible(""))
            .element("#a", FakeElement::visible(""));
        let candidates = [
            SelectorCandidate { css: "#a", description: "a" },
            SelectorCandidate { css: "#b", description: "b" },
        ];
        assert_eq!(first_visible(&dom, &candidates).unwrap().unwrap().css, "#a");
    }

    #[test]
    fn first_clickable_skips_hidden_and_disabled() {
        let dom = FakeDom::default()
            .element("#hidden", FakeElement::hidden())
            .element("#disabled", FakeElement::disabled())
            .element("#live", FakeElement::visible(""));
        let candidates = [
            SelectorCandidate { css: "#hidden", description: "hidden" },
            SelectorCandidate { css: "#disabled", description: "disabled" },
            SelectorCandidate { css: "#live", description: "live" },
        ];
        assert_eq!(
            first_clickable(&dom, &candidates).unwrap().unwrap().css,
            "#live"
        );
    }

    #[test]
    fn error_text_ignores_hidden_and_blank_banners() {
        let dom = FakeDom::default()
            .element(".alert-danger", FakeElement::hidden())
            .element("[role=\"alert\"]", FakeElement::visible("   "))
            .element(".error-message", FakeElement::visible("Space is already booked"));
        assert_eq!(
            first_error_text(&dom, ERROR_BANNERS).unwrap().as_deref(),
            Some("Space is already booked")
        );
    }
}
