//! Classification rule handlers and the suggestion endpoint

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::api::dto::ApiResponse;
use crate::api::handlers::{domain_error_response, AppState};
use crate::auth::middleware::CurrentUser;
use crate::domain::classification::{
    ClassificationCandidate, ClassificationRule, NewClassificationRule, Suggestion,
};
use crate::domain::disbursement::Classification;

/// Classification rule
#[derive(Debug, Serialize, ToSchema)]
pub struct ClassificationRuleDto {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    /// Target classification: `PS`, `MOOE`, `CO`, `TR`
    pub classification: String,
    pub keywords: Vec<String>,
    pub min_amount_centavos: Option<i64>,
    pub max_amount_centavos: Option<i64>,
    pub department: Option<String>,
    pub is_active: bool,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

impl From<ClassificationRule> for ClassificationRuleDto {
    fn from(r: ClassificationRule) -> Self {
        Self {
            id: r.id,
            name: r.name,
            description: r.description,
            classification: r.classification.to_string(),
            keywords: r.keywords,
            min_amount_centavos: r.min_amount_centavos,
            max_amount_centavos: r.max_amount_centavos,
            department: r.department,
            is_active: r.is_active,
            created_by: r.created_by,
            created_at: r.created_at,
        }
    }
}

/// Create-rule request
#[derive(Debug, Deserialize, ToSchema, Validate)]
#[schema(example = json!({
    "name": "Salary Payments",
    "description": "Automatic classification for salary-related payments",
    "classification": "PS",
    "keywords": ["salary", "wage", "pay", "compensation", "allowance"],
    "is_active": true
}))]
pub struct CreateRuleRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    pub description: Option<String>,
    /// Target classification: `PS`, `MOOE`, `CO`, `TR`
    pub classification: String,
    /// Matched case-insensitively against payee and description
    #[validate(length(min = 1))]
    pub keywords: Vec<String>,
    pub min_amount_centavos: Option<i64>,
    pub max_amount_centavos: Option<i64>,
    pub department: Option<String>,
    /// Defaults to true
    pub is_active: Option<bool>,
}

/// Update-rule request (partial)
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateRuleRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub classification: Option<String>,
    pub keywords: Option<Vec<String>>,
    pub min_amount_centavos: Option<i64>,
    pub max_amount_centavos: Option<i64>,
    pub department: Option<String>,
    pub is_active: Option<bool>,
}

/// Entry to classify
#[derive(Debug, Deserialize, ToSchema)]
#[schema(example = json!({
    "payee": "John Doe",
    "amount_centavos": 4500000,
    "description": "Monthly salary payment for January 2024",
    "department": "Human Resources"
}))]
pub struct SuggestRequest {
    pub payee: String,
    pub amount_centavos: i64,
    pub description: String,
    pub department: String,
}

/// Suggested classification
#[derive(Debug, Serialize, ToSchema)]
pub struct SuggestionDto {
    /// Suggested classification: `PS`, `MOOE`, `CO`, `TR`
    pub classification: String,
    /// Confidence 0-95
    pub confidence: u32,
    pub reason: String,
    pub matched_rule: Option<String>,
    pub matched_keywords: Vec<String>,
}

impl From<Suggestion> for SuggestionDto {
    fn from(s: Suggestion) -> Self {
        Self {
            classification: s.classification.to_string(),
            confidence: s.confidence,
            reason: s.reason,
            matched_rule: s.matched_rule,
            matched_keywords: s.matched_keywords,
        }
    }
}

fn bad_request(message: String) -> (StatusCode, Json<ApiResponse<()>>) {
    (StatusCode::BAD_REQUEST, Json(ApiResponse::error(message)))
}

/// List classification rules
#[utoipa::path(
    get,
    path = "/api/v1/classifications/rules",
    tag = "Classifications",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All rules", body = ApiResponse<Vec<ClassificationRuleDto>>)
    )
)]
pub async fn list_rules(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<ClassificationRuleDto>>>, (StatusCode, Json<ApiResponse<()>>)> {
    let rules = state
        .repos
        .classification_rules()
        .find_all()
        .await
        .map_err(domain_error_response)?;
    Ok(Json(ApiResponse::success(
        rules.into_iter().map(Into::into).collect(),
    )))
}

/// Create a classification rule
#[utoipa::path(
    post,
    path = "/api/v1/classifications/rules",
    tag = "Classifications",
    security(("bearer_auth" = [])),
    request_body = CreateRuleRequest,
    responses(
        (status = 201, description = "Rule created", body = ApiResponse<ClassificationRuleDto>),
        (status = 400, description = "Validation failed")
    )
)]
pub async fn create_rule(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Json(request): Json<CreateRuleRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ClassificationRuleDto>>), (StatusCode, Json<ApiResponse<()>>)>
{
    request
        .validate()
        .map_err(|e| bad_request(e.to_string()))?;

    let Some(classification) = Classification::parse(&request.classification) else {
        return Err(bad_request(format!(
            "Unknown classification: {}",
            request.classification
        )));
    };

    let created = state
        .repos
        .classification_rules()
        .create(
            NewClassificationRule {
                name: request.name,
                description: request.description,
                classification,
                keywords: request.keywords,
                min_amount_centavos: request.min_amount_centavos,
                max_amount_centavos: request.max_amount_centavos,
                department: request.department,
                is_active: request.is_active.unwrap_or(true),
            },
            &current.user.id,
        )
        .await
        .map_err(domain_error_response)?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(created.into())),
    ))
}

/// Update a classification rule
#[utoipa::path(
    put,
    path = "/api/v1/classifications/rules/{id}",
    tag = "Classifications",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Rule id")),
    request_body = UpdateRuleRequest,
    responses(
        (status = 200, description = "Rule updated", body = ApiResponse<ClassificationRuleDto>),
        (status = 404, description = "Rule not found")
    )
)]
pub async fn update_rule(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateRuleRequest>,
) -> Result<Json<ApiResponse<ClassificationRuleDto>>, (StatusCode, Json<ApiResponse<()>>)> {
    let existing = state
        .repos
        .classification_rules()
        .find_by_id(&id)
        .await
        .map_err(domain_error_response)?;

    let Some(mut rule) = existing else {
        return Err((
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error("Classification rule not found")),
        ));
    };

    if let Some(name) = request.name {
        rule.name = name;
    }
    if let Some(description) = request.description {
        rule.description = Some(description);
    }
    if let Some(name) = &request.classification {
        match Classification::parse(name) {
            Some(c) => rule.classification = c,
            None => return Err(bad_request(format!("Unknown classification: {}", name))),
        }
    }
    if let Some(keywords) = request.keywords {
        rule.keywords = keywords;
    }
    if let Some(min) = request.min_amount_centavos {
        rule.min_amount_centavos = Some(min);
    }
    if let Some(max) = request.max_amount_centavos {
        rule.max_amount_centavos = Some(max);
    }
    if let Some(department) = request.department {
        rule.department = Some(department);
    }
    if let Some(is_active) = request.is_active {
        rule.is_active = is_active;
    }

    state
        .repos
        .classification_rules()
        .update(rule.clone())
        .await
        .map_err(domain_error_response)?;

    Ok(Json(ApiResponse::success(rule.into())))
}

/// Delete a classification rule
#[utoipa::path(
    delete,
    path = "/api/v1/classifications/rules/{id}",
    tag = "Classifications",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Rule id")),
    responses(
        (status = 200, description = "Rule deleted"),
        (status = 404, description = "Rule not found")
    )
)]
pub async fn delete_rule(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, (StatusCode, Json<ApiResponse<()>>)> {
    state
        .repos
        .classification_rules()
        .delete(&id)
        .await
        .map_err(domain_error_response)?;
    Ok(Json(ApiResponse::success(())))
}

/// Suggest a classification for an entry
///
/// Scores the entry against the active rule set; returns the default
/// (MOOE, confidence 30) when no rule scores higher.
#[utoipa::path(
    post,
    path = "/api/v1/classifications/suggest",
    tag = "Classifications",
    security(("bearer_auth" = [])),
    request_body = SuggestRequest,
    responses(
        (status = 200, description = "Suggested classification", body = ApiResponse<SuggestionDto>)
    )
)]
pub async fn suggest_classification(
    State(state): State<AppState>,
    Json(request): Json<SuggestRequest>,
) -> Result<Json<ApiResponse<SuggestionDto>>, (StatusCode, Json<ApiResponse<()>>)> {
    let candidate = ClassificationCandidate {
        payee: request.payee,
        amount_centavos: request.amount_centavos,
        description: request.description,
        department: request.department,
    };
    let suggestion = state
        .disbursements
        .suggest_classification(&candidate)
        .await
        .map_err(domain_error_response)?;
    Ok(Json(ApiResponse::success(suggestion.into())))
}
