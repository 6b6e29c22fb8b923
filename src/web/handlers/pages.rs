// Page handlers for HTML rendering with Askama
//
// htmx requests get fragments (the result panel or the input workbench);
// plain browser requests get the full page.

use askama::Template;
use axum::{
    extract::{Form, Path, State},
    response::{Html, IntoResponse, Response},
};
use axum_htmx::HxRequest;
use serde::Deserialize;

use crate::api_server::{AppError, AppState};
use crate::catalog::CROPS;
use crate::features::{FeatureGroup, FeatureVector, FEATURES, N_FEATURES, PRESETS};
use crate::report::{markdown_to_html, ReportFormatter};

// ============================================================================
// View Models
// ============================================================================

pub struct SliderView {
    pub name: &'static str,
    pub label: &'static str,
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub value: f64,
}

pub struct PresetView {
    pub index: usize,
    pub name: &'static str,
    pub summary: String,
}

fn sliders(values: &FeatureVector, group: FeatureGroup) -> Vec<SliderView> {
    FEATURES
        .iter()
        .filter(|spec| spec.group == group)
        .map(|spec| SliderView {
            name: spec.key.field_name(),
            label: spec.label,
            min: spec.min,
            max: spec.max,
            step: spec.step,
            value: values.get(spec.key),
        })
        .collect()
}

fn presets() -> Vec<PresetView> {
    PRESETS
        .iter()
        .enumerate()
        .map(|(index, preset)| PresetView {
            index,
            name: preset.name,
            summary: preset
                .features
                .to_row()
                .iter()
                .map(|v| v.to_string())
                .collect::<Vec<_>>()
                .join(", "),
        })
        .collect()
}

// ============================================================================
// Templates
// ============================================================================

/// Sliders, buttons, presets and the result panel
#[derive(Template)]
#[template(path = "partials/workbench.html")]
pub struct WorkbenchTemplate {
    pub soil: Vec<SliderView>,
    pub climate: Vec<SliderView>,
    pub presets: Vec<PresetView>,
    pub result_html: String,
}

impl WorkbenchTemplate {
    pub fn new(values: &FeatureVector, result_html: String) -> Self {
        Self {
            soil: sliders(values, FeatureGroup::Soil),
            climate: sliders(values, FeatureGroup::Climate),
            presets: presets(),
            result_html,
        }
    }
}

#[derive(Template)]
#[template(path = "pages/home.html")]
pub struct HomeTemplate {
    pub title: String,
    pub workbench_html: String,
    pub crop_count: usize,
    pub model_name: String,
    pub tree_count: usize,
    pub normalization: String,
}

fn render<T: Template>(template: &T) -> Result<String, AppError> {
    template.render().map_err(|e| {
        tracing::error!("Template error: {}", e);
        AppError::Internal(format!("Template error: {}", e))
    })
}

fn full_page(state: &AppState, workbench: &WorkbenchTemplate) -> Result<Html<String>, AppError> {
    let classifier = state.context.classifier();
    let page = HomeTemplate {
        title: "Crop Recommendation".to_string(),
        workbench_html: render(workbench)?,
        crop_count: CROPS.len(),
        model_name: classifier.name().to_string(),
        tree_count: classifier.n_trees(),
        normalization: state.context.stage().describe(),
    };
    Ok(Html(render(&page)?))
}

/// Workbench fragment for htmx, full page otherwise
fn workbench_response(
    state: &AppState,
    is_htmx: bool,
    workbench: WorkbenchTemplate,
) -> Result<Response, AppError> {
    if is_htmx {
        Ok(Html(render(&workbench)?).into_response())
    } else {
        Ok(full_page(state, &workbench)?.into_response())
    }
}

// ============================================================================
// Home Page
// ============================================================================

pub async fn home_page(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    full_page(&state, &WorkbenchTemplate::new(&FeatureVector::default(), String::new()))
}

// ============================================================================
// Recommendation
// ============================================================================

/// Raw form fields; parsed by hand so bad input becomes an error report
#[derive(Debug, Default, Deserialize)]
pub struct FormInputs {
    pub n: Option<String>,
    pub p: Option<String>,
    pub k: Option<String>,
    pub temperature: Option<String>,
    pub humidity: Option<String>,
    pub ph: Option<String>,
    pub rainfall: Option<String>,
}

impl FormInputs {
    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "n" => self.n.as_deref(),
            "p" => self.p.as_deref(),
            "k" => self.k.as_deref(),
            "temperature" => self.temperature.as_deref(),
            "humidity" => self.humidity.as_deref(),
            "ph" => self.ph.as_deref(),
            "rainfall" => self.rainfall.as_deref(),
            _ => None,
        }
    }

    /// Values in column order; missing or non-numeric fields are errors
    pub fn parse(&self) -> Result<Vec<f64>, String> {
        let mut values = Vec::with_capacity(N_FEATURES);
        let mut problems = Vec::new();
        for spec in &FEATURES {
            let name = spec.key.field_name();
            match self.field(name).map(str::trim) {
                None | Some("") => problems.push(format!("missing value for {}", name)),
                Some(raw) => match raw.parse::<f64>() {
                    Ok(v) => values.push(v),
                    Err(_) => problems.push(format!("invalid value for {}: {:?}", name, raw)),
                },
            }
        }
        if problems.is_empty() {
            Ok(values)
        } else {
            Err(problems.join("; "))
        }
    }

    /// Slider positions to redisplay, defaults where a field did not parse
    fn redisplay(&self) -> FeatureVector {
        let mut row = FeatureVector::default().to_row();
        for (slot, spec) in row.iter_mut().zip(FEATURES.iter()) {
            if let Some(v) = self
                .field(spec.key.field_name())
                .and_then(|raw| raw.trim().parse::<f64>().ok())
            {
                *slot = v;
            }
        }
        FeatureVector::from_slice(&row).unwrap_or_default()
    }
}

pub async fn recommend_form(
    State(state): State<AppState>,
    HxRequest(is_htmx): HxRequest,
    Form(form): Form<FormInputs>,
) -> Result<Response, AppError> {
    let report = match form.parse() {
        Ok(values) => state.context.recommend_report(&values),
        Err(problems) => {
            tracing::warn!("Rejected form input: {}", problems);
            ReportFormatter::format_error(&problems)
        }
    };
    let result_html = markdown_to_html(&report);

    if is_htmx {
        return Ok(Html(result_html).into_response());
    }
    Ok(full_page(&state, &WorkbenchTemplate::new(&form.redisplay(), result_html))?.into_response())
}

// ============================================================================
// Clear / Presets
// ============================================================================

/// Reset every slider to its default and empty the result panel
pub async fn clear_inputs(
    State(state): State<AppState>,
    HxRequest(is_htmx): HxRequest,
) -> Result<Response, AppError> {
    workbench_response(
        &state,
        is_htmx,
        WorkbenchTemplate::new(&FeatureVector::default(), String::new()),
    )
}

/// Fill the sliders from a preset row
pub async fn load_preset(
    State(state): State<AppState>,
    HxRequest(is_htmx): HxRequest,
    Path(index): Path<usize>,
) -> Result<Response, AppError> {
    let preset = PRESETS
        .get(index)
        .ok_or_else(|| AppError::NotFound(format!("No preset {}", index)))?;
    workbench_response(
        &state,
        is_htmx,
        WorkbenchTemplate::new(&preset.features, String::new()),
    )
}
