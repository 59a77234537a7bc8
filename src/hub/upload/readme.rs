extern crate handlebars;
extern crate serde;

use crate::submission::SubmissionRecord;
use handlebars::{no_escape, Handlebars, RenderError};
use serde::Serialize;

const TEMPLATE: &str = "# {{title}}\n\n{{description}}";

#[derive(Serialize)]
struct ReadmeParam<'a> {
    title: &'a str,
    description: &'a str,
}

/// Markdown placed next to every uploaded solution.
pub struct Readme {
    engine: Handlebars<'static>,
}
impl Readme {
    pub fn new() -> Self {
        let mut engine = Handlebars::new();
        engine.register_escape_fn(no_escape);
        Readme { engine }
    }
    pub fn render(&self, record: &SubmissionRecord) -> Result<String, RenderError> {
        self.engine.render_template(
            TEMPLATE,
            &ReadmeParam {
                title: &record.title,
                description: &record.description,
            },
        )
    }
}
impl Default for Readme {
    fn default() -> Self {
        Self::new()
    }
}
