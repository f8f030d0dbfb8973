use crate::dom::{first_visible, Dom};
use crate::selectors::{SelectorCandidate, SIGNATURE_FIELDS, TITLE_FIELDS};
use anyhow::Result;

/// Fills the title and signature fields. Fill is best-effort: a field with
/// no matching candidate is left blank rather than failing the attempt,
/// since the site treats both as optional on some layouts.
pub(crate) fn fill_booking_fields(dom: &dyn Dom, title: &str, signature: &str) -> Result<()> {
    fill_field(dom, TITLE_FIELDS, title, "title")?;
    fill_field(dom, SIGNATURE_FIELDS, signature, "signature")?;
    Ok(())
}

fn fill_field(
    dom: &dyn Dom,
    candidates: &[SelectorCandidate],
    value: &str,
    what: &str,
) -> Result<()> {
    match first_visible(dom, candidates)? {
        Some(found) => {
            dom.fill(found.css, value)?;
            log::debug!("[*] Filled {} field via {}", what, found.description);
        }
        None => {
            log::debug!("[!] No {} field matched, leaving it blank", what);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::fixtures::{FakeDom, FakeElement};

    #[test]
    fn fills_both_fields_through_the_first_matching_candidate() {
        let dom = FakeDom::default()
            .element("input[name=\"title\"]", FakeElement::visible(""))
            .element("input[name=\"signature\"]", FakeElement::visible(""));

        fill_booking_fields(&dom, "11:45AM - 1:15PM", "J. Resident").unwrap();

        let filled = dom.filled.borrow();
        assert_eq!(
            *filled,
            vec![
                (
                    "input[name=\"title\"]".to_string(),
                    "11:45AM - 1:15PM".to_string()
                ),
                (
                    "input[name=\"signature\"]".to_string(),
                    "J. Resident".to_string()
                ),
            ]
        );
    }

    #[test]
    fn falls_back_to_lower_priority_candidates() {
        let dom = FakeDom::default()
            .element("input[name=\"title\"]", FakeElement::hidden())
            .element("#title", FakeElement::visible(""));

        fill_booking_fields(&dom, "Morning slot", "Sig").unwrap();

        let filled = dom.filled.borrow();
        assert_eq!(filled[0].0, "#title");
    }

    #[test]
    fn missing_fields_are_skipped_silently() {
        let dom = FakeDom::default();
        fill_booking_fields(&dom, "Morning slot", "Sig").unwrap();
        assert!(dom.filled.borrow().is_empty());
    }
}
