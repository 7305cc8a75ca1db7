use std::rc::Rc;

use rod_bridge::{HeadlessEngine, Rod, WebViewOptions, WindowOptions};
use rod_common::{RodError, Size};
use rod_config::RodConfig;
use tracing::info;

use crate::cli::Args;

/// Webview options from config, with CLI overrides applied.
pub fn webview_options(args: &Args, config: &RodConfig) -> WebViewOptions {
    let playground = &config.playground;
    let window = WindowOptions {
        title: Some(args.title.clone().unwrap_or_else(|| playground.title.clone())),
        focused: Some(false),
        size: Some(Size::new(playground.width, playground.height)),
        ..WindowOptions::default()
    };
    WebViewOptions {
        url: Some(args.url.clone().unwrap_or_else(|| playground.url.clone())),
        ..WebViewOptions::from(window)
    }
}

/// Open one webview, run the poll timer for `args.ticks` ticks, then tear
/// everything down. Must run inside a `LocalSet`.
pub async fn run(args: &Args, config: &RodConfig) -> Result<(), RodError> {
    let engine = Rc::new(HeadlessEngine::new());
    let rod = Rod::with_config(engine.clone(), &config.event_loop)?;

    let webview = rod.create_webview(&webview_options(args, config))?;
    let size = webview.window().size()?;
    info!(
        id = %webview.id(),
        width = size.width,
        height = size.height,
        url = %webview.url()?,
        "webview opened"
    );

    webview.window().on_resized(|size| {
        info!(width = size.width, height = size.height, "webview resized");
    });
    let closing = webview.clone();
    webview.window().on_close_requested(move || {
        info!("close requested");
        closing.destroy();
    });

    rod.start()?;
    // Nudge the window once so the event path is exercised.
    let doubled = Size::new(size.width.saturating_mul(2), size.height.saturating_mul(2));
    engine.emit_resized(webview.id(), doubled);
    tokio::time::sleep(rod.event_loop().interval() * args.ticks).await;
    engine.emit_close_requested(webview.id());
    tokio::time::sleep(rod.event_loop().interval() * 2).await;

    info!(
        windows = rod.window_count(),
        closed = webview.window().is_destroyed(),
        "shutting down"
    );
    rod.destroy();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn options_follow_config_then_cli() {
        let config = RodConfig::default();
        let args = Args::try_parse_from(["rod"]).unwrap();
        let options = webview_options(&args, &config);
        assert_eq!(options.window.title.as_deref(), Some("Rod WebView Playground"));
        assert_eq!(options.window.size, Some(Size::new(400, 300)));
        assert_eq!(options.window.focused, Some(false));
        assert_eq!(options.url.as_deref(), Some("https://example.com"));

        let args =
            Args::try_parse_from(["rod", "--title", "Mine", "--url", "https://a.test"]).unwrap();
        let options = webview_options(&args, &config);
        assert_eq!(options.window.title.as_deref(), Some("Mine"));
        assert_eq!(options.url.as_deref(), Some("https://a.test"));
    }

    #[tokio::test]
    async fn run_completes() {
        let local = tokio::task::LocalSet::new();
        let args = Args::try_parse_from(["rod", "--ticks", "2"]).unwrap();
        let config = RodConfig::default();
        local
            .run_until(async { run(&args, &config).await })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn run_survives_huge_configured_size() {
        let local = tokio::task::LocalSet::new();
        let args = Args::try_parse_from(["rod", "--ticks", "1"]).unwrap();
        let mut config = RodConfig::default();
        config.playground.width = u32::MAX;
        config.playground.height = u32::MAX;
        local
            .run_until(async { run(&args, &config).await })
            .await
            .unwrap();
    }
}
