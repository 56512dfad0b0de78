//! Scripted browser doubles shared by the integration tests

#![allow(dead_code)]

use futures::future::BoxFuture;
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use page_distill::browser::{NavigationResponse, PageSession, SessionLauncher, WaitUntil, with_page_timeout};
use page_distill::{ExtractError, ExtractResult, StealthProfile};

/// What every session from a [`ScriptedLauncher`] does
#[derive(Debug, Clone)]
pub struct SessionScript {
    pub navigate: ExtractResult<NavigationResponse>,
    /// Simulated page load time, checked against the navigation timeout
    pub load_time: Duration,
    pub evaluate: ExtractResult<serde_json::Value>,
    pub content: ExtractResult<String>,
}

impl SessionScript {
    pub fn serving(html: &str) -> Self {
        Self {
            navigate: Ok(NavigationResponse { status: Some(200) }),
            load_time: Duration::ZERO,
            evaluate: Ok(serde_json::Value::from(0)),
            content: Ok(html.to_string()),
        }
    }
}

/// Everything the launcher and its sessions observed
#[derive(Debug, Default)]
pub struct Recorder {
    pub launches: AtomicUsize,
    pub closes: AtomicUsize,
    pub evaluations: AtomicUsize,
    pub stealth: Mutex<Vec<Option<StealthProfile>>>,
    pub waits: Mutex<Vec<WaitUntil>>,
    pub urls: Mutex<Vec<String>>,
}

impl Recorder {
    pub fn launches(&self) -> usize {
        self.launches.load(Ordering::SeqCst)
    }

    pub fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }

    pub fn evaluations(&self) -> usize {
        self.evaluations.load(Ordering::SeqCst)
    }
}

pub struct ScriptedLauncher {
    script: SessionScript,
    launch_error: Option<ExtractError>,
    pub recorder: Arc<Recorder>,
}

impl ScriptedLauncher {
    pub fn new(script: SessionScript) -> Self {
        Self {
            script,
            launch_error: None,
            recorder: Arc::new(Recorder::default()),
        }
    }

    pub fn serving(html: &str) -> Self {
        Self::new(SessionScript::serving(html))
    }

    pub fn failing(error: ExtractError) -> Self {
        Self {
            launch_error: Some(error),
            ..Self::serving("")
        }
    }
}

impl SessionLauncher for ScriptedLauncher {
    fn launch<'a>(
        &'a self,
        stealth: Option<&'a StealthProfile>,
    ) -> BoxFuture<'a, ExtractResult<Box<dyn PageSession>>> {
        Box::pin(async move {
            self.recorder.launches.fetch_add(1, Ordering::SeqCst);
            self.recorder.stealth.lock().push(stealth.cloned());
            if let Some(error) = &self.launch_error {
                return Err(error.clone());
            }
            Ok(Box::new(ScriptedSession {
                script: self.script.clone(),
                recorder: Arc::clone(&self.recorder),
            }) as Box<dyn PageSession>)
        })
    }
}

pub struct ScriptedSession {
    script: SessionScript,
    recorder: Arc<Recorder>,
}

impl PageSession for ScriptedSession {
    fn navigate<'a>(
        &'a mut self,
        url: &'a str,
        wait_until: WaitUntil,
        timeout: Duration,
    ) -> BoxFuture<'a, ExtractResult<NavigationResponse>> {
        Box::pin(async move {
            self.recorder.urls.lock().push(url.to_string());
            self.recorder.waits.lock().push(wait_until);
            let load_time = self.script.load_time;
            with_page_timeout(
                async {
                    tokio::time::sleep(load_time).await;
                    Ok(())
                },
                timeout,
                "Page navigation",
            )
            .await?;
            self.script.navigate.clone()
        })
    }

    fn evaluate<'a>(
        &'a mut self,
        _script: &'a str,
    ) -> BoxFuture<'a, ExtractResult<serde_json::Value>> {
        Box::pin(async move {
            self.recorder.evaluations.fetch_add(1, Ordering::SeqCst);
            self.script.evaluate.clone()
        })
    }

    fn content(&mut self) -> BoxFuture<'_, ExtractResult<String>> {
        Box::pin(async move { self.script.content.clone() })
    }

    fn close(self: Box<Self>) -> BoxFuture<'static, ()> {
        Box::pin(async move {
            self.recorder.closes.fetch_add(1, Ordering::SeqCst);
        })
    }
}

/// Article page whose `.article-content` region holds `body_text`
pub fn article_page(body_text: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head><title>Article</title><script>window.tracking = true;</script></head>
<body>
  <header><a href="/">Logo</a></header>
  <nav><a href="/news">News</a> <a href="/sport">Sport</a></nav>
  <div class="article-content">
    <p>{body_text}</p>
  </div>
  <footer>Copyright</footer>
</body>
</html>"#
    )
}

/// Deterministic prose of at least `min_chars` characters
pub fn prose(min_chars: usize) -> String {
    let sentence = "The quick brown fox jumps over the lazy dog near the river bank. ";
    sentence
        .repeat(min_chars / sentence.len() + 1)
        .trim()
        .to_string()
}
