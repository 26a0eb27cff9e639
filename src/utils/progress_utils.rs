use indicatif::ProgressStyle;
use tracing::{info_span, Span};
use tracing_indicatif::span_ext::IndicatifSpanExt;

/// A span carrying a styled bar of `len` steps, or `None` when there is
/// nothing to track. The bar is drawn by the `IndicatifLayer` while the span
/// is entered, so log lines print above it instead of through it.
pub fn progress_span(len: u64, msg: &str) -> Option<Span> {
    if len == 0 {
        return None;
    }

    let span = info_span!("progress", len);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("[{elapsed_precise} / {eta_precise}] {bar:40.cyan/blue} {pos:>7}/{len:7} {msg}")
    {
        span.pb_set_style(&style.progress_chars("##-"));
    }
    span.pb_set_length(len);
    span.pb_set_message(msg);

    Some(span)
}
