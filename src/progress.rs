use indicatif::{ProgressBar, ProgressStyle};

/// Standard bar for the two scrape phases (listing pages, detail items).
pub fn bar(len: u64, message: &'static str) -> ProgressBar {
    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{msg} [{elapsed_precise}] {bar:40} {pos}/{len} (eta {eta})")
            .unwrap()
            .progress_chars("=> "),
    );
    pb.set_message(message);
    pb
}
