pub mod auth;
pub mod patient;
pub mod epc;
pub mod hce;
pub mod admin;
pub mod feedback;
pub mod snomed;

pub use auth::{LoginRequest, Role, TokenClaims, TokenResponse, User};
pub use patient::{Patient, PatientInput, PatientPage};
pub use epc::{Admission, Epc, EpcContext, EpcPatch, GeneratedContent, GeneratedSections, StaffMember};
pub use hce::{ExternalEpisode, HceEntry, HceHistory, HceImportRequest, HceImportResult};
pub use admin::{AdminUser, Branding, CostRow, GoldenRule, HealthStatus, ServiceState, Tenant};
pub use feedback::{FeedbackTab, FeedbackTabKind};
pub use snomed::SnomedConcept;
