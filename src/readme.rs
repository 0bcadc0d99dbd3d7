use chrono::{DateTime, Utc};

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M UTC";

/// Profile README pointing at the rendered animation.
pub fn build_readme(image_name: &str, generated_at: DateTime<Utc>) -> String {
    let stamp = generated_at.format(TIMESTAMP_FORMAT);
    format!(
        r#"<p align="center">
  <img src="./{image_name}" alt="Terminal animation"/>
</p>

<p align="center">
  Auto-generated by profile-terminal.
</p>

<p align="center">Last updated: {stamp}</p>
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn embeds_image_and_utc_timestamp() {
        let at = Utc.with_ymd_and_hms(2024, 3, 9, 7, 5, 59).unwrap();
        let readme = build_readme("output.svg", at);
        assert!(readme.contains(r#"<img src="./output.svg""#));
        assert!(readme.contains("Last updated: 2024-03-09 07:05 UTC"));
    }

    #[test]
    fn same_instant_gives_same_readme() {
        let at = Utc.with_ymd_and_hms(2025, 12, 31, 23, 59, 0).unwrap();
        assert_eq!(build_readme("a.svg", at), build_readme("a.svg", at));
    }
}
