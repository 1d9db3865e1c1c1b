//! Community participation: trust scoring for reporters and volunteers.

pub mod router;
pub mod trust;

pub use router::community_router;
pub use trust::{
    assess_trust, can_perform, TrustActivity, TrustAssessment, TrustFactor, TrustLevel,
    TrustRecommendation, TrustStats, TrustedAction,
};
