use serde::{Deserialize, Serialize};
use crate::models::auth::string_or_number;

/// Pestañas del visor de feedback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackTabKind {
    Resumen,
    PorSeccion,
    Comentarios,
}

impl FeedbackTabKind {
    pub const ALL: [FeedbackTabKind; 3] = [
        FeedbackTabKind::Resumen,
        FeedbackTabKind::PorSeccion,
        FeedbackTabKind::Comentarios,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            FeedbackTabKind::Resumen => "Resumen",
            FeedbackTabKind::PorSeccion => "Por sección",
            FeedbackTabKind::Comentarios => "Comentarios",
        }
    }

    pub fn endpoint(&self) -> &'static str {
        match self {
            FeedbackTabKind::Resumen => "/admin/feedback/summary",
            FeedbackTabKind::PorSeccion => "/admin/feedback/sections",
            FeedbackTabKind::Comentarios => "/admin/feedback/comments",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackSummary {
    pub total_epcs: u64,
    #[serde(default)]
    pub con_feedback: u64,
    #[serde(default)]
    pub puntaje_promedio: Option<f64>,
    /// Porcentaje de texto generado que el médico modificó (0-100)
    #[serde(default)]
    pub tasa_edicion: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackBySection {
    pub seccion: String,
    #[serde(default)]
    pub evaluaciones: u64,
    #[serde(default)]
    pub puntaje_promedio: Option<f64>,
    #[serde(default)]
    pub tasa_edicion: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackComment {
    #[serde(deserialize_with = "string_or_number")]
    pub epc_id: String,
    #[serde(default)]
    pub seccion: Option<String>,
    #[serde(default)]
    pub autor: Option<String>,
    #[serde(default)]
    pub puntaje: Option<f64>,
    pub comentario: String,
    #[serde(default)]
    pub fecha: Option<String>,
}

/// Datos de una pestaña, ya decodificados con la forma que corresponde
#[derive(Debug, Clone, PartialEq)]
pub enum FeedbackTab {
    Resumen(FeedbackSummary),
    PorSeccion(Vec<FeedbackBySection>),
    Comentarios(Vec<FeedbackComment>),
}

impl FeedbackTab {
    pub fn kind(&self) -> FeedbackTabKind {
        match self {
            FeedbackTab::Resumen(_) => FeedbackTabKind::Resumen,
            FeedbackTab::PorSeccion(_) => FeedbackTabKind::PorSeccion,
            FeedbackTab::Comentarios(_) => FeedbackTabKind::Comentarios,
        }
    }
}
