//! Plain-text rendering of the content view for `--text` mode.

use crate::lifecycle::{View, EMPTY_TEXT, LOADING_TEXT};
use crate::model::Movie;

/// Pre-formatted lines for text output.
pub(crate) struct TextView {
    pub lines: Vec<String>,
}

pub(crate) fn movie_heading(m: &Movie) -> String {
    format!("{} ({})", m.title, m.release_date)
}

pub(crate) fn build_text_view(view: View<'_>) -> TextView {
    let lines = match view {
        View::Loading => vec![LOADING_TEXT.to_string()],
        View::Error(msg) => vec![msg.to_string()],
        View::Empty => vec![EMPTY_TEXT.to_string()],
        View::Movies(movies) => {
            let mut lines = Vec::with_capacity(movies.len() * 2);
            for m in movies {
                lines.push(movie_heading(m));
                for l in m.opening_text.lines() {
                    lines.push(format!("    {}", l.trim_end()));
                }
            }
            lines
        }
    };
    TextView { lines }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::AppState;

    #[test]
    fn renders_each_state() {
        let s = AppState::default();
        assert_eq!(build_text_view(s.view()).lines, vec!["Found no movies."]);

        let s = s.loading_started();
        assert_eq!(build_text_view(s.view()).lines, vec!["Loading..."]);

        let s = s.loading_failed("Something went wrong!");
        assert_eq!(
            build_text_view(s.view()).lines,
            vec!["Something went wrong!"]
        );
    }

    #[test]
    fn renders_movies_with_indented_text() {
        let s = AppState::default().loading_succeeded(vec![Movie {
            id: "1".into(),
            title: "A".into(),
            opening_text: "line one\nline two".into(),
            release_date: "2020-01-01".into(),
        }]);
        assert_eq!(
            build_text_view(s.view()).lines,
            vec!["A (2020-01-01)", "    line one", "    line two"]
        );
    }
}
