use indicatif::{ProgressBar, ProgressStyle};

/// Byte progress bar for an upload of `total` bytes, drawn on stderr.
pub fn upload_bar(total: u64, key: &str) -> ProgressBar {
    let bar = ProgressBar::new(total);
    let style = ProgressStyle::with_template(
        "{msg}\n{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] \
         {bytes}/{total_bytes} ({bytes_per_sec}, {eta})",
    )
    .unwrap_or_else(|_| ProgressStyle::default_bar())
    .progress_chars("#>-");
    bar.set_style(style);
    bar.set_message(format!("Uploading {key}"));
    bar
}
