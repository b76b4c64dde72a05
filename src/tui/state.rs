use crate::lifecycle::AppState;
use crate::model::{NewMovie, ResponseShape};
use time::macros::format_description;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    List,
    Form,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormField {
    #[default]
    Title,
    OpeningText,
    ReleaseDate,
}

impl FormField {
    pub const ALL: [FormField; 3] = [
        FormField::Title,
        FormField::OpeningText,
        FormField::ReleaseDate,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FormField::Title => "Title",
            FormField::OpeningText => "Opening Text",
            FormField::ReleaseDate => "Release Date",
        }
    }

    fn next(self) -> Self {
        match self {
            FormField::Title => FormField::OpeningText,
            FormField::OpeningText => FormField::ReleaseDate,
            FormField::ReleaseDate => FormField::Title,
        }
    }

    fn prev(self) -> Self {
        match self {
            FormField::Title => FormField::ReleaseDate,
            FormField::OpeningText => FormField::Title,
            FormField::ReleaseDate => FormField::OpeningText,
        }
    }
}

/// Transient add-movie form values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MovieForm {
    pub title: String,
    pub opening_text: String,
    pub release_date: String,
    pub field: FormField,
}

impl MovieForm {
    pub fn value(&self, field: FormField) -> &str {
        match field {
            FormField::Title => &self.title,
            FormField::OpeningText => &self.opening_text,
            FormField::ReleaseDate => &self.release_date,
        }
    }

    fn value_mut(&mut self) -> &mut String {
        match self.field {
            FormField::Title => &mut self.title,
            FormField::OpeningText => &mut self.opening_text,
            FormField::ReleaseDate => &mut self.release_date,
        }
    }

    pub fn push_char(&mut self, c: char) {
        self.value_mut().push(c);
    }

    pub fn backspace(&mut self) {
        self.value_mut().pop();
    }

    pub fn next_field(&mut self) {
        self.field = self.field.next();
    }

    pub fn prev_field(&mut self) {
        self.field = self.field.prev();
    }

    pub fn on_last_field(&self) -> bool {
        self.field == FormField::ReleaseDate
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Build the create request, or explain what is missing.
    pub fn validate(&self) -> Result<NewMovie, String> {
        for field in FormField::ALL {
            if self.value(field).trim().is_empty() {
                return Err(format!("{} is required.", field.label()));
            }
        }
        let release_date = self.release_date.trim();
        if time::Date::parse(release_date, format_description!("[year]-[month]-[day]")).is_err()
        {
            return Err(format!(
                "Release Date must be a calendar date like 2020-01-01 (got \"{release_date}\")."
            ));
        }
        Ok(NewMovie {
            title: self.title.trim().to_string(),
            opening_text: self.opening_text.trim().to_string(),
            release_date: release_date.to_string(),
        })
    }
}

pub struct UiState {
    pub tab: usize,
    pub focus: Focus,
    pub app: AppState,
    pub form: MovieForm,
    pub info: String,
    pub store_url: String,
    pub shape: ResponseShape,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            tab: 0,
            focus: Focus::List,
            app: AppState::default(),
            form: MovieForm::default(),
            info: String::new(),
            store_url: String::new(),
            shape: ResponseShape::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> MovieForm {
        MovieForm {
            title: " A ".into(),
            opening_text: "txt".into(),
            release_date: "2020-01-01".into(),
            field: FormField::ReleaseDate,
        }
    }

    #[test]
    fn validate_trims_and_builds_movie() {
        let m = filled().validate().unwrap();
        assert_eq!(m.title, "A");
        assert_eq!(m.release_date, "2020-01-01");
    }

    #[test]
    fn validate_requires_every_field() {
        let mut f = filled();
        f.opening_text = "   ".into();
        assert_eq!(f.validate().unwrap_err(), "Opening Text is required.");
    }

    #[test]
    fn validate_rejects_bad_dates() {
        for bad in ["2020-13-01", "2020-02-30", "01/01/2020", "soon"] {
            let mut f = filled();
            f.release_date = bad.into();
            assert!(f.validate().is_err(), "{bad} accepted");
        }
    }

    #[test]
    fn field_navigation_wraps() {
        let mut f = MovieForm::default();
        f.prev_field();
        assert_eq!(f.field, FormField::ReleaseDate);
        f.next_field();
        assert_eq!(f.field, FormField::Title);
        f.push_char('x');
        f.push_char('y');
        f.backspace();
        assert_eq!(f.title, "x");
    }
}
