use crate::dom::Dom;
use crate::selectors::SelectorCandidate;
use crate::utils::js_escape;
use anyhow::Result;
use headless_chrome::Tab;
use std::sync::Arc;
use std::thread::sleep;
use std::time::{Duration, Instant};

/// How often bounded element waits re-probe the page.
const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Thin wrapper around a Chrome tab. Hosts the low-level JS helpers and the
/// live [`Dom`] implementation, so the higher-level booking handlers never
/// touch the tab directly.
pub(crate) struct BookingTab(pub(crate) Arc<Tab>);

impl BookingTab {
    pub(crate) fn new(tab: Arc<Tab>) -> Self {
        Self(tab)
    }

    // ── Low-level JS evaluation helpers ──────────────────────────────────

    /// Evaluates JS and returns the boolean result.
    /// Returns `false` if the script returns null/undefined.
    pub(crate) fn eval_bool(&self, js: &str) -> Result<bool> {
        Ok(self
            .0
            .evaluate(js, false)?
            .value
            .and_then(|v| v.as_bool())
            .unwrap_or(false))
    }

    /// Evaluates JS and returns the string result, or `None` if
    /// null/undefined.
    pub(crate) fn eval_string(&self, js: &str) -> Result<Option<String>> {
        Ok(self
            .0
            .evaluate(js, false)?
            .value
            .and_then(|v| v.as_str().map(|s| s.to_string())))
    }

    /// Evaluates JS for its side effects; propagates errors, discards the
    /// return value.
    pub(crate) fn eval(&self, js: &str) -> Result<()> {
        self.0.evaluate(js, false)?;
        Ok(())
    }

    // ── Waits ────────────────────────────────────────────────────────────

    /// Polls until one of the candidates has a visible match, or the wait
    /// budget runs out.
    pub(crate) fn wait_for_candidate<'a>(
        &self,
        candidates: &'a [SelectorCandidate],
        timeout: Duration,
    ) -> Result<Option<&'a SelectorCandidate>> {
        let deadline = Instant::now() + timeout;
        loop {
            if let Some(found) = crate::dom::first_visible(self, candidates)? {
                return Ok(Some(found));
            }
            if Instant::now() >= deadline {
                return Ok(None);
            }
            sleep(POLL_INTERVAL);
        }
    }

    pub(crate) fn press_enter(&self) -> Result<()> {
        self.0.press_key("Enter")?;
        Ok(())
    }

    /// Blocks until the pending navigation settles. `Err` means the bounded
    /// wait ran out.
    pub(crate) fn wait_for_navigation(&self) -> Result<()> {
        self.0.wait_until_navigated()?;
        Ok(())
    }

    /// Logs title, visible inputs, buttons and headers at debug level.
    /// Used when verification cannot tell what the page is showing.
    pub(crate) fn log_page_state(&self) -> Result<()> {
        let js = r#"
            (function() {
                const info = {
                    title: document.title,
                    url: window.location.href,
                    visibleInputs: Array.from(document.querySelectorAll('input, textarea'))
                        .filter(el => el.offsetParent !== null)
                        .map(el => ({ type: el.type, name: el.name, id: el.id, placeholder: el.placeholder }))
                        .slice(0, 8),
                    visibleButtons: Array.from(document.querySelectorAll('button, input[type="submit"]'))
                        .filter(el => el.offsetParent !== null)
                        .map(el => ({ text: el.innerText || el.value || '', id: el.id, type: el.type }))
                        .slice(0, 5),
                    headers: Array.from(document.querySelectorAll('h1, h2, [role="heading"]'))
                        .filter(el => el.offsetParent !== null)
                        .map(el => el.innerText.trim())
                        .filter(text => text.length > 0)
                        .slice(0, 3),
                };
                return JSON.stringify(info, null, 2);
            })()
        "#;

        if let Some(state) = self.eval_string(js)? {
            log::debug!("[Page State] {}", state);
        }
        Ok(())
    }
}

impl Dom for BookingTab {
    fn is_visible(&self, css: &str) -> Result<bool> {
        let sel = js_escape(css);
        let js = format!(
            r#"(function() {{
    var els = document.querySelectorAll('{sel}');
    for (var i = 0; i < els.length; i++) {{
        if (els[i].offsetParent !== null) return true;
    }}
    return false;
}})()"#
        );
        self.eval_bool(&js)
    }

    fn is_clickable(&self, css: &str) -> Result<bool> {
        let sel = js_escape(css);
        let js = format!(
            r#"(function() {{
    var els = document.querySelectorAll('{sel}');
    for (var i = 0; i < els.length; i++) {{
        var el = els[i];
        if (el.offsetParent === null || el.disabled) continue;
        var r = el.getBoundingClientRect();
        var inView = r.bottom > 0 && r.right > 0 &&
                     r.top < window.innerHeight && r.left < window.innerWidth;
        if (inView) return true;
    }}
    return false;
}})()"#
        );
        self.eval_bool(&js)
    }

    fn visible_text(&self, css: &str) -> Result<Option<String>> {
        let sel = js_escape(css);
        let js = format!(
            r#"(function() {{
    var els = document.querySelectorAll('{sel}');
    for (var i = 0; i < els.length; i++) {{
        var el = els[i];
        if (el.offsetParent !== null && el.innerText && el.innerText.trim().length > 0) {{
            return el.innerText.trim();
        }}
    }}
    return null;
}})()"#
        );
        self.eval_string(&js)
    }

    fn fill(&self, css: &str, value: &str) -> Result<()> {
        let sel = js_escape(css);
        let val = js_escape(value);
        let js = format!(
            r#"
var el = document.querySelector('{sel}');
if (el) {{
    el.focus();
    if (el.select) el.select();
    el.value = '{val}';
    el.dispatchEvent(new Event('input', {{ bubbles: true }}));
    el.dispatchEvent(new Event('change', {{ bubbles: true }}));
}}"#
        );
        self.eval(&js)
    }

    fn click(&self, css: &str) -> Result<()> {
        self.0.find_element(css)?.click()?;
        Ok(())
    }

    fn click_via_script(&self, css: &str) -> Result<()> {
        let sel = js_escape(css);
        let js = format!(
            "var el = document.querySelector('{sel}'); if (el) {{ el.focus(); el.click(); }}"
        );
        self.eval(&js)
    }

    fn button_labels(&self, scope: Option<&str>) -> Result<Vec<String>> {
        let scope_literal = match scope {
            Some(scope) => format!("'{}'", js_escape(scope)),
            None => "null".to_string(),
        };
        let js = format!(
            r#"(function() {{
    var sel = 'button, input[type="submit"]';
    var scope = {scope_literal};
    var nodes = [];
    if (scope) {{
        document.querySelectorAll(scope).forEach(function(container) {{
            container.querySelectorAll(sel).forEach(function(el) {{
                if (nodes.indexOf(el) === -1) nodes.push(el);
            }});
        }});
    }} else {{
        document.querySelectorAll(sel).forEach(function(el) {{ nodes.push(el); }});
    }}
    document.querySelectorAll('[data-pb-idx]').forEach(function(el) {{
        el.removeAttribute('data-pb-idx');
    }});
    var labels = [];
    var idx = 0;
    nodes.forEach(function(el) {{
        if (el.offsetParent === null || el.disabled) return;
        el.setAttribute('data-pb-idx', idx);
        labels.push((el.innerText || el.value || '').trim());
        idx++;
    }});
    return JSON.stringify(labels);
}})()"#
        );
        let raw = self.eval_string(&js)?.unwrap_or_else(|| "[]".to_string());
        let labels: Vec<String> = serde_json::from_str(&raw)?;
        Ok(labels)
    }

    fn url(&self) -> String {
        self.0.get_url()
    }

    fn title(&self) -> Result<String> {
        self.0.get_title()
    }
}
