//! Sponsor and club team directory endpoints.
//!
//! - GET /sponsors - List sponsors, newest first
//! - POST /sponsors - Add a sponsor (admin)
//! - DELETE /sponsors/:id - Remove a sponsor (admin)
//! - GET /team-members - List the club team, newest first
//! - POST /team-members - Add a team member (admin)
//! - DELETE /team-members/:id - Remove a team member (admin)

use crate::error::AppError;
use crate::extractors::AdminKey;
use crate::server::state::AppState;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use clubhub_core::types::{Sponsor, SponsorId, TeamMember, TeamMemberId};
use serde::Deserialize;
use uuid::Uuid;

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request to add a sponsor.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SponsorSpec {
    /// Sponsor name
    pub name: String,
    /// Sponsorship tier (e.g. "gold")
    #[serde(default)]
    pub tier: Option<String>,
    /// Sponsor website
    #[serde(default)]
    pub website: Option<String>,
    /// Logo image URL
    #[serde(default)]
    pub logo_url: Option<String>,
}

/// Request to add a club team member.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMemberSpec {
    /// Member name
    pub name: String,
    /// Role in the club (e.g. "Design Lead")
    #[serde(default)]
    pub role: Option<String>,
    /// Contact email
    #[serde(default)]
    pub email: Option<String>,
    /// Profile photo URL
    #[serde(default)]
    pub photo_url: Option<String>,
}

// ============================================================================
// Handlers
// ============================================================================

/// List sponsors, newest first.
///
/// Public endpoint - no authentication required.
///
/// # Example
///
/// ```bash
/// curl http://localhost:8080/sponsors
/// ```
pub async fn list_sponsors(State(state): State<AppState>) -> Result<Json<Vec<Sponsor>>, AppError> {
    let sponsors = state.directory.list_sponsors().await?;
    Ok(Json(sponsors))
}

/// Add a sponsor.
///
/// Requires the admin bearer key.
///
/// # Example
///
/// ```bash
/// curl -X POST http://localhost:8080/sponsors \
///   -H "Authorization: Bearer <admin_key>" \
///   -H "Content-Type: application/json" \
///   -d '{"name": "Acme Robotics", "tier": "gold", "website": "https://acme.example"}'
/// ```
pub async fn create_sponsor(
    _admin: AdminKey,
    State(state): State<AppState>,
    Json(spec): Json<SponsorSpec>,
) -> Result<(StatusCode, Json<Sponsor>), AppError> {
    if spec.name.trim().is_empty() {
        return Err(AppError::bad_request("Sponsor name is required"));
    }

    let sponsor = Sponsor {
        id: SponsorId::new(),
        name: spec.name,
        tier: spec.tier,
        website: spec.website,
        logo_url: spec.logo_url,
        created_at: state.clock.now(),
    };
    state.directory.insert_sponsor(&sponsor).await?;

    Ok((StatusCode::CREATED, Json(sponsor)))
}

/// Remove a sponsor.
///
/// Requires the admin bearer key.
///
/// # Example
///
/// ```bash
/// curl -X DELETE http://localhost:8080/sponsors/550e8400-e29b-41d4-a716-446655440000 \
///   -H "Authorization: Bearer <admin_key>"
/// ```
pub async fn delete_sponsor(
    _admin: AdminKey,
    Path(sponsor_id): Path<Uuid>,
    State(state): State<AppState>,
) -> Result<StatusCode, AppError> {
    state
        .directory
        .delete_sponsor(SponsorId::from_uuid(sponsor_id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// List the club team, newest first.
///
/// Public endpoint - no authentication required.
///
/// # Example
///
/// ```bash
/// curl http://localhost:8080/team-members
/// ```
pub async fn list_team_members(
    State(state): State<AppState>,
) -> Result<Json<Vec<TeamMember>>, AppError> {
    let members = state.directory.list_team_members().await?;
    Ok(Json(members))
}

/// Add a club team member.
///
/// Requires the admin bearer key.
///
/// # Example
///
/// ```bash
/// curl -X POST http://localhost:8080/team-members \
///   -H "Authorization: Bearer <admin_key>" \
///   -H "Content-Type: application/json" \
///   -d '{"name": "Asha Iyer", "role": "Events Lead", "email": "asha@club.dev"}'
/// ```
pub async fn create_team_member(
    _admin: AdminKey,
    State(state): State<AppState>,
    Json(spec): Json<TeamMemberSpec>,
) -> Result<(StatusCode, Json<TeamMember>), AppError> {
    if spec.name.trim().is_empty() {
        return Err(AppError::bad_request("Team member name is required"));
    }

    let member = TeamMember {
        id: TeamMemberId::new(),
        name: spec.name,
        role: spec.role,
        email: spec.email,
        photo_url: spec.photo_url,
        created_at: state.clock.now(),
    };
    state.directory.insert_team_member(&member).await?;

    Ok((StatusCode::CREATED, Json(member)))
}

/// Remove a club team member.
///
/// Requires the admin bearer key.
///
/// # Example
///
/// ```bash
/// curl -X DELETE http://localhost:8080/team-members/550e8400-e29b-41d4-a716-446655440000 \
///   -H "Authorization: Bearer <admin_key>"
/// ```
pub async fn delete_team_member(
    _admin: AdminKey,
    Path(member_id): Path<Uuid>,
    State(state): State<AppState>,
) -> Result<StatusCode, AppError> {
    state
        .directory
        .delete_team_member(TeamMemberId::from_uuid(member_id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
