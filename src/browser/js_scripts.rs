//! JavaScript evaluated in live pages

/// Ready state plus resource-entry count, polled to detect network idle
pub const NETWORK_IDLE_PROBE: &str = r"
    (() => ({
        readyState: document.readyState,
        resources: performance.getEntriesByType('resource').length
    }))()
";

/// HTTP status of the main document, when the browser exposes it
pub const NAVIGATION_STATUS: &str = r"
    (() => {
        const nav = performance.getEntriesByType('navigation')[0];
        return nav && typeof nav.responseStatus === 'number' ? nav.responseStatus : null;
    })()
";

/// Removes overlays that hide the page: cookie banners, consent walls,
/// newsletter modals, and fixed/sticky elements stacked above the content.
/// Restores scrolling on `html`/`body` afterwards. Returns the removal count.
pub const OVERLAY_REMOVAL_SCRIPT: &str = r"
    (() => {
        let removed = 0;
        const pattern = /(cookie|consent|gdpr|popup|modal|overlay|newsletter|subscribe|paywall|lightbox)/i;

        const candidates = Array.from(document.querySelectorAll('body *'));
        for (const el of candidates) {
            if (!el.isConnected) {
                continue;
            }
            const marker = `${el.id || ''} ${typeof el.className === 'string' ? el.className : ''} ${el.getAttribute('role') || ''}`;
            const style = window.getComputedStyle(el);
            const position = style.position;
            const zIndex = parseInt(style.zIndex, 10);
            const rect = el.getBoundingClientRect();
            const coversViewport = rect.width >= window.innerWidth * 0.5 && rect.height >= window.innerHeight * 0.3;

            const isDialog = el.getAttribute('role') === 'dialog' || el.getAttribute('aria-modal') === 'true';
            const isFloating = (position === 'fixed' || position === 'sticky') && !Number.isNaN(zIndex) && zIndex >= 100;

            if ((pattern.test(marker) && (isFloating || isDialog)) || (isFloating && coversViewport) || isDialog) {
                el.remove();
                removed += 1;
            }
        }

        for (const root of [document.documentElement, document.body]) {
            if (root) {
                root.style.setProperty('overflow', 'auto', 'important');
                root.style.setProperty('position', 'static', 'important');
            }
        }
        return removed;
    })()
";
