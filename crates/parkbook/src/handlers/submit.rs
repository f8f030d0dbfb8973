use crate::dom::{first_clickable, indexed_button, pick_by_keyword, Dom};
use crate::error::BookingError;
use crate::selectors::{
    CONFIRM_KEYWORDS, CONFIRM_STRUCTURAL, DIALOG_CONFIRM, DIALOG_CONTAINERS, DIALOG_KEYWORDS,
};
use anyhow::Result;

/// Attempts a native click; a native failure (overlay in the way, element
/// re-rendered mid-click) falls back to a script-dispatched click on the
/// same element. There is no third strategy.
pub(crate) fn click_with_fallback(dom: &dyn Dom, css: &str) -> Result<()> {
    match dom.click(css) {
        Ok(()) => Ok(()),
        Err(primary) => {
            log::debug!(
                "[!] Native click on {} failed ({}), dispatching script click",
                css,
                primary
            );
            dom.click_via_script(css)
        }
    }
}

/// Resolves the confirm control in two phases: structural selectors from
/// most specific to most generic, then a keyword scan over visible, enabled
/// buttons.
pub(crate) fn resolve_confirm(dom: &dyn Dom) -> Result<Option<(String, String)>> {
    if let Some(found) = first_clickable(dom, CONFIRM_STRUCTURAL)? {
        return Ok(Some((
            found.css.to_string(),
            found.description.to_string(),
        )));
    }

    let labels = dom.button_labels(None)?;
    if let Some(index) = pick_by_keyword(&labels, CONFIRM_KEYWORDS) {
        return Ok(Some((
            indexed_button(index),
            format!("button labeled {:?}", labels[index]),
        )));
    }

    Ok(None)
}

/// Finds and activates the confirmation control.
pub(crate) fn click_confirm(dom: &dyn Dom) -> Result<(), BookingError> {
    let (css, description) = resolve_confirm(dom)?.ok_or_else(|| {
        BookingError::ConfirmButtonNotFound { url: dom.url() }
    })?;

    log::info!("[*] Clicking confirm control: {}", description);
    click_with_fallback(dom, &css)?;
    Ok(())
}

/// Handles at most one post-submission dialog. Probes modal-scoped
/// selectors first, then scans button text inside modal containers; clicks
/// the first hit and stops. Chained dialogs are left alone.
pub(crate) fn dismiss_confirmation_dialog(dom: &dyn Dom) -> Result<()> {
    if let Some(found) = first_clickable(dom, DIALOG_CONFIRM)? {
        log::info!("[*] Confirmation dialog detected, clicking {}", found.description);
        return click_with_fallback(dom, found.css);
    }

    let labels = dom.button_labels(Some(DIALOG_CONTAINERS))?;
    if let Some(index) = pick_by_keyword(&labels, DIALOG_KEYWORDS) {
        log::info!(
            "[*] Confirmation dialog detected, clicking button {:?}",
            labels[index]
        );
        return click_with_fallback(dom, &indexed_button(index));
    }

    log::debug!("[*] No confirmation dialog appeared");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::fixtures::{FakeDom, FakeElement};
    use crate::error::BookingError;

    #[test]
    fn structural_phase_wins_when_a_selector_matches() {
        let dom = FakeDom::default()
            .element("button[type=\"submit\"]", FakeElement::visible("Go"))
            .button("Confirm booking", None);

        click_confirm(&dom).unwrap();

        assert_eq!(*dom.clicks.borrow(), vec!["button[type=\"submit\"]"]);
    }

    #[test]
    fn structural_candidates_are_tried_most_specific_first() {
        let dom = FakeDom::default()
            .element(
                ".modal-footer button.btn-success",
                FakeElement::visible("Confirm"),
            )
            .element("button[type=\"submit\"]", FakeElement::visible("Other"));

        click_confirm(&dom).unwrap();

        assert_eq!(
            *dom.clicks.borrow(),
            vec![".modal-footer button.btn-success"]
        );
    }

    #[test]
    fn disabled_structural_matches_fall_through_to_the_text_phase() {
        let dom = FakeDom::default()
            .element("button[type=\"submit\"]", FakeElement::disabled())
            .button("Cancel", None)
            .button("Book this space", None);

        click_confirm(&dom).unwrap();

        // Second button (index 1) carries the "book" keyword.
        assert_eq!(*dom.clicks.borrow(), vec![indexed_button(1)]);
    }

    #[test]
    fn keyword_priority_orders_the_text_phase() {
        let dom = FakeDom::default()
            .button("Submit form", None)
            .button("Confirm booking", None);

        click_confirm(&dom).unwrap();

        // "confirm" outranks "submit" even though submit appears first.
        assert_eq!(*dom.clicks.borrow(), vec![indexed_button(1)]);
    }

    #[test]
    fn no_candidate_at_all_is_a_typed_error() {
        let dom = FakeDom::with_url("https://parkhurst.skedda.com/booking?x=1")
            .button("Cancel", None);

        let err = click_confirm(&dom).unwrap_err();
        assert!(matches!(err, BookingError::ConfirmButtonNotFound { .. }));
    }

    #[test]
    fn native_click_failure_falls_back_to_script_click() {
        let mut dom = FakeDom::default()
            .element("button[type=\"submit\"]", FakeElement::visible("Confirm"));
        dom.native_click_fails.push("button[type=\"submit\"]".to_string());

        click_confirm(&dom).unwrap();

        assert!(dom.clicks.borrow().is_empty());
        assert_eq!(*dom.script_clicks.borrow(), vec!["button[type=\"submit\"]"]);
    }

    #[test]
    fn dialog_text_probe_only_sees_buttons_inside_containers() {
        let dom = FakeDom::default()
            .button("Confirm", None) // outside any dialog container
            .button("OK", Some(DIALOG_CONTAINERS));

        dismiss_confirmation_dialog(&dom).unwrap();

        // Scoped enumeration only lists the OK button, so it gets index 0.
        assert_eq!(*dom.clicks.borrow(), vec![indexed_button(0)]);
    }

    #[test]
    fn absent_dialog_is_not_an_error() {
        let dom = FakeDom::default();
        dismiss_confirmation_dialog(&dom).unwrap();
        assert!(dom.clicks.borrow().is_empty());
    }
}
