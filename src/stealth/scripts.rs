//! Init-time evasion scripts
//!
//! Each script is registered with `Page.addScriptToEvaluateOnNewDocument`, so
//! it runs before any page script on every navigation.

/// `navigator.webdriver` reports absent
pub const NAVIGATOR_WEBDRIVER: &str = r"
    Object.defineProperty(Object.getPrototypeOf(navigator), 'webdriver', {
        get: () => undefined,
        configurable: true
    });
";

/// Non-empty `navigator.plugins` shaped like desktop Chrome's
pub const NAVIGATOR_PLUGINS: &str = r"
    (() => {
        const mockPlugins = [
            {
                name: 'PDF Viewer',
                description: 'Portable Document Format',
                filename: 'internal-pdf-viewer',
                mimeTypes: [{ type: 'application/pdf', suffixes: 'pdf', description: 'Portable Document Format' }]
            },
            {
                name: 'Chrome PDF Viewer',
                description: 'Portable Document Format',
                filename: 'internal-pdf-viewer',
                mimeTypes: [{ type: 'application/pdf', suffixes: 'pdf', description: 'Portable Document Format' }]
            },
            {
                name: 'Chromium PDF Viewer',
                description: 'Portable Document Format',
                filename: 'internal-pdf-viewer',
                mimeTypes: [{ type: 'application/pdf', suffixes: 'pdf', description: 'Portable Document Format' }]
            }
        ];

        const pluginsProto = Object.getPrototypeOf(navigator.plugins);
        Object.defineProperty(navigator, 'plugins', {
            get: () => {
                const plugins = {};
                mockPlugins.forEach((plugin, i) => {
                    plugins[i] = plugin;
                    plugins[plugin.name] = plugin;
                });
                plugins.item = (i) => mockPlugins[i] || null;
                plugins.namedItem = (name) => mockPlugins.find(p => p.name === name) || null;
                plugins.refresh = () => {};
                Object.setPrototypeOf(plugins, pluginsProto);
                Object.defineProperty(plugins, 'length', { value: mockPlugins.length });
                return plugins;
            },
            configurable: true
        });
    })();
";

/// Minimal `window.chrome.runtime` stub
pub const CHROME_RUNTIME: &str = r"
    (() => {
        if (!window.chrome) {
            Object.defineProperty(window, 'chrome', {
                value: {},
                writable: true,
                enumerable: true,
                configurable: false
            });
        }

        if (!window.chrome.runtime) {
            window.chrome.runtime = {
                OnInstalledReason: { INSTALL: 'install', UPDATE: 'update', CHROME_UPDATE: 'chrome_update' },
                PlatformOs: { WIN: 'win', MAC: 'mac', LINUX: 'linux', ANDROID: 'android' },
                connect: () => ({
                    onMessage: { addListener: () => {}, removeListener: () => {} },
                    onDisconnect: { addListener: () => {}, removeListener: () => {} },
                    postMessage: () => {},
                    disconnect: () => {}
                }),
                sendMessage: () => {},
                id: undefined
            };
        }
    })();
";

/// `Notification` permission queries answer consistently with `Notification.permission`
pub const NAVIGATOR_PERMISSIONS: &str = r"
    (() => {
        if (!window.navigator.permissions || !window.navigator.permissions.query) {
            return;
        }
        const originalQuery = window.navigator.permissions.query.bind(window.navigator.permissions);
        window.navigator.permissions.query = (parameters) => (
            parameters && parameters.name === 'notifications'
                ? Promise.resolve({ state: Notification.permission, onchange: null })
                : originalQuery(parameters)
        );
    })();
";

/// WebGL unmasked vendor/renderer look like a common desktop GPU
pub const WEBGL_VENDOR: &str = r"
    (() => {
        const handler = {
            apply: function(target, ctx, args) {
                const param = (args && args[0]) || null;
                // UNMASKED_VENDOR_WEBGL
                if (param === 37445) {
                    return 'Intel Inc.';
                }
                // UNMASKED_RENDERER_WEBGL
                if (param === 37446) {
                    return 'Intel(R) UHD Graphics';
                }
                return Reflect.apply(target, ctx, args);
            }
        };

        for (const ctx of [window.WebGLRenderingContext, window.WebGL2RenderingContext]) {
            if (ctx && ctx.prototype.getParameter) {
                ctx.prototype.getParameter = new Proxy(ctx.prototype.getParameter, handler);
            }
        }
    })();
";

/// `navigator.languages` / `navigator.language` matching the profile locale
///
/// `languages_json` must be a JSON array of strings.
#[must_use]
pub fn navigator_languages(languages_json: &str, primary: &str) -> String {
    format!(
        r"
    (() => {{
        const languages = Object.freeze({languages_json});
        Object.defineProperty(Object.getPrototypeOf(navigator), 'languages', {{
            get: () => languages,
            configurable: true
        }});
        Object.defineProperty(Object.getPrototypeOf(navigator), 'language', {{
            get: () => {primary},
            configurable: true
        }});
    }})();
"
    )
}
