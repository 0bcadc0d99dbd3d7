use crate::config::Config;
use crate::stats::{Stats, format_lines};
use crate::terminal::{Recording, Terminal};

// header highlight: black on cyan
const HEADER_ON: &str = "\x1b[30;46m";
const RESET: &str = "\x1b[0m";

/// Summary printed by `github --summary`: a highlighted header followed by
/// one `- Label: value` line per configured statistic.
pub fn summary_text(username: &str, stats: &Stats, config: &Config) -> String {
    let mut out = format!("{HEADER_ON} {username}@github {RESET}\n");
    for line in format_lines(stats, &config.stat_lines) {
        out.push_str("- ");
        out.push_str(&line);
        out.push('\n');
    }
    out
}

/// The scripted visitor session that ends up in the animation.
pub fn record_session(config: &Config, stats: &Stats) -> Recording {
    let user = config.username.as_str();
    let mut t = Terminal::new(config.terminal.clone());
    t.set_bg(&config.background);
    t.set_font_color(&config.font_color);

    t.gen_text("Booting profile terminal...", 1, 1, 12, false);
    t.gen_text("Initializing session for visitor", 2, 1, 12, false);
    t.gen_text("", 3, 1, 10, false);

    type_command(&mut t, 4, "whoami");
    t.gen_text(user, 5, 1, 8, false);

    type_command(&mut t, 6, "github --summary");
    t.gen_text(&summary_text(user, stats, config), 7, 2, 3, true);

    let row = t.curr_row() + 1;
    type_command(&mut t, row, "echo 'thanks for visiting'");
    let row = t.curr_row() + 1;
    t.gen_text("thanks for visiting", row, 1, 8, false);

    let row = t.curr_row() + 1;
    t.gen_text("", row, 1, 120, true);
    t.finish()
}

fn type_command(t: &mut Terminal, row: usize, command: &str) {
    t.toggle_show_cursor(true);
    t.gen_prompt(row);
    t.gen_typing_text(command, row, true);
    t.toggle_show_cursor(false);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terminal::Frame;
    use pretty_assertions::assert_eq;

    fn screen_lines(frame: &Frame) -> Vec<String> {
        frame
            .screen
            .iter()
            .map(|row| row.iter().map(|c| c.ch).collect::<String>().trim_end().to_string())
            .collect()
    }

    fn stats() -> Stats {
        Stats {
            total_stargazers: Some(42),
            total_commits_last_year: None,
            total_pull_requests_made: Some(3),
            rank_level: Some("A+".to_string()),
            top_languages: Some(vec!["Python".to_string(), "Go".to_string()]),
        }
    }

    #[test]
    fn summary_lists_configured_lines() {
        let config = Config::default();
        let text = summary_text("octocat", &stats(), &config);
        assert_eq!(
            text,
            "\x1b[30;46m octocat@github \x1b[0m\n\
             - Stars: 42\n\
             - Commits (last year): N/A\n\
             - Pull requests: 3\n\
             - Rank: A+\n\
             - Top languages: Python, Go\n"
        );
    }

    #[test]
    fn final_screen_shows_whole_session() {
        let config = Config {
            username: "octocat".to_string(),
            ..Config::default()
        };
        let rec = record_session(&config, &stats());
        let last = rec.frames.last().unwrap();
        let lines = screen_lines(last);

        assert_eq!(
            &lines[..15],
            &[
                "Booting profile terminal...",
                "Initializing session for visitor",
                "",
                "$ whoami",
                "octocat",
                "$ github --summary",
                "  octocat@github",
                " - Stars: 42",
                " - Commits (last year): N/A",
                " - Pull requests: 3",
                " - Rank: A+",
                " - Top languages: Python, Go",
                "",
                "$ echo 'thanks for visiting'",
                "thanks for visiting",
            ]
        );
        assert_eq!(last.cursor, None);
        // farewell line held for 8 frames, merged with the final 120-frame pause
        assert_eq!(last.count, 128);
    }

    #[test]
    fn session_uses_configured_colors() {
        let config = Config {
            background: "#000000".to_string(),
            ..Config::default()
        };
        let rec = record_session(&config, &Stats::default());
        assert_eq!(rec.background, "#000000");
        assert_eq!(rec.foreground, "#c9d1d9");
    }
}
