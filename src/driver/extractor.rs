use base64::{engine::general_purpose, Engine as _};
use serde::Deserialize;

use crate::driver::config::SelectorConfig;
use crate::driver::{DriverError, DriverErrorKind};

/// Builds the JavaScript evaluated inside the page to pull structured fields
pub struct ExtractionScripts {
    selectors: SelectorConfig,
}

/// Quote a value as a JavaScript string literal
fn js_string(value: &str) -> String {
    serde_json::Value::String(value.to_string()).to_string()
}

impl ExtractionScripts {
    pub fn new(selectors: SelectorConfig) -> Self {
        Self { selectors }
    }

    /// Script returning `ArticleSummary`-shaped objects for every card on a list page
    pub fn articles_script(&self) -> String {
        let card = js_string(&self.selectors.card);
        let title_link = js_string(&self.selectors.title_link);
        let source = js_string(&self.selectors.source);
        let date = js_string(&self.selectors.date);

        format!(
            r#"
            (() => {{
                const text = (el) => {{
                    const value = el ? el.innerText.trim() : '';
                    return value.length ? value : null;
                }};
                return Array.from(document.querySelectorAll({card})).map(card => {{
                    const link = card.querySelector({title_link});
                    return {{
                        title: text(link),
                        detailUrl: link && link.href ? link.href : null,
                        source: text(card.querySelector({source})),
                        publishedDateRaw: text(card.querySelector({date}))
                    }};
                }});
            }})()
            "#
        )
    }

    /// Script returning `ImageDescriptor`-shaped objects for a detail page
    pub fn images_script(&self) -> String {
        let image = js_string(&self.selectors.image);
        let attribute = js_string(&self.selectors.filename_attribute);

        format!(
            r#"
            (() => {{
                return Array.from(document.querySelectorAll({image}))
                    .filter(img => img.src)
                    .map(img => {{
                        const anchor = img.closest('a');
                        const name = anchor ? anchor.getAttribute({attribute}) : null;
                        return {{
                            sourceUrl: img.src,
                            suggestedFilename: name && name.trim().length ? name.trim() : null
                        }};
                    }});
            }})()
            "#
        )
    }

    /// Script fetching `url` with the page's cookies, resolving to a [`FetchedBinary`].
    ///
    /// A rejected `fetch` resolves to `{ status: 0, error }` instead of throwing.
    pub fn fetch_script(&self, url: &str) -> String {
        let url = js_string(url);

        format!(
            r#"
            (async () => {{
                let bytes;
                let status = 0;
                try {{
                    const res = await fetch({url}, {{ credentials: 'include' }});
                    status = res.status;
                    if (!res.ok) {{
                        return {{ status }};
                    }}
                    bytes = new Uint8Array(await res.arrayBuffer());
                }} catch (e) {{
                    return {{ status, error: String(e) }};
                }}
                let binary = '';
                for (let i = 0; i < bytes.length; i += 0x8000) {{
                    binary += String.fromCharCode.apply(null, bytes.subarray(i, i + 0x8000));
                }}
                return {{ status, body: btoa(binary) }};
            }})()
            "#
        )
    }
}

/// Result of [`ExtractionScripts::fetch_script`]
#[derive(Debug, Deserialize)]
pub struct FetchedBinary {
    pub status: u16,
    /// Base64 response body, present for 2xx responses
    #[serde(default)]
    pub body: Option<String>,
    /// Message of a rejected `fetch` (network failure, aborted body read)
    #[serde(default)]
    pub error: Option<String>,
}

impl FetchedBinary {
    pub fn into_bytes(self, url: &str) -> Result<Vec<u8>, DriverError> {
        if let Some(error) = self.error {
            // a rejected fetch never reached an HTTP response
            let kind = match DriverError::classify_message(&error) {
                DriverErrorKind::Other | DriverErrorKind::Extraction => {
                    DriverErrorKind::ConnectionReset
                }
                kind => kind,
            };
            return Err(DriverError::new(
                kind,
                format!("Fetching {} failed: {}", url, error),
            ));
        }

        if !(200..300).contains(&self.status) {
            return Err(DriverError::new(
                DriverErrorKind::HttpStatus(self.status),
                format!("Fetching {} returned status {}", url, self.status),
            ));
        }

        let body = self.body.unwrap_or_default();
        general_purpose::STANDARD
            .decode(body.as_bytes())
            .map_err(|e| DriverError::extraction(format!("Bad body for {}: {}", url, e)))
    }
}
