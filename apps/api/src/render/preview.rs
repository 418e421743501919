//! Live preview rendering: projection → screen markup for one template variant.

use minijinja::{context, Environment, UndefinedBehavior};
use serde::{Deserialize, Serialize};

use crate::models::resume::TemplateId;
use crate::render::projector::Projection;
use crate::render::theme::PresentedResume;
use crate::render::RenderError;

const MACROS: &str = include_str!("../../templates/preview/_macros.html");
const CLASSIC: &str = include_str!("../../templates/preview/classic.html");
const MODERN: &str = include_str!("../../templates/preview/modern.html");
const MINIMALIST: &str = include_str!("../../templates/preview/minimalist.html");
const EXECUTIVE: &str = include_str!("../../templates/preview/executive.html");
const STYLESHEET: &str = include_str!("../../templates/preview/preview.css");

/// Preview container width. Only the container changes; content and order never do.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Viewport {
    #[default]
    Desktop,
    Mobile,
}

impl Viewport {
    pub fn as_str(&self) -> &'static str {
        match self {
            Viewport::Desktop => "desktop",
            Viewport::Mobile => "mobile",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "desktop" => Some(Viewport::Desktop),
            "mobile" => Some(Viewport::Mobile),
            _ => None,
        }
    }
}

/// Holds the compiled preview templates. Build once and share behind an `Arc`.
#[derive(Debug)]
pub struct PreviewRenderer {
    env: Environment<'static>,
}

impl PreviewRenderer {
    pub fn new() -> Result<Self, RenderError> {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.add_template("_macros.html", MACROS)?;
        env.add_template("classic.html", CLASSIC)?;
        env.add_template("modern.html", MODERN)?;
        env.add_template("minimalist.html", MINIMALIST)?;
        env.add_template("executive.html", EXECUTIVE)?;
        Ok(PreviewRenderer { env })
    }

    /// Same environment with one template swapped out.
    #[cfg(test)]
    pub(crate) fn with_override(name: &'static str, source: &'static str) -> Result<Self, RenderError> {
        let mut renderer = Self::new()?;
        renderer.env.add_template(name, source)?;
        Ok(renderer)
    }

    /// Renders the projection with its selected template inside the given viewport.
    pub fn render(&self, projection: &Projection, viewport: Viewport) -> Result<String, RenderError> {
        let template = self.env.get_template(template_file(projection.template))?;
        let resume = PresentedResume::from_projection(projection);
        let markup = template.render(context! {
            resume => resume,
            viewport => viewport.as_str(),
        })?;
        Ok(markup)
    }

    /// Screen stylesheet the preview markup is written against.
    pub fn stylesheet() -> &'static str {
        STYLESHEET
    }
}

fn template_file(template: TemplateId) -> &'static str {
    match template {
        TemplateId::Classic => "classic.html",
        TemplateId::Modern => "modern.html",
        TemplateId::Minimalist => "minimalist.html",
        TemplateId::Executive => "executive.html",
    }
}
