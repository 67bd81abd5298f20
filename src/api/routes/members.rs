use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::models::{Member, MemberId, NewMember, Team};

#[derive(Debug, Deserialize)]
pub struct ListMembersParams {
    pub team: Option<String>,
    pub sort: Option<String>,
    pub order: Option<String>,
}

/// Roster sort keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberSort {
    Name,
    Number,
    BirthDate,
    Generation,
}

impl MemberSort {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.to_lowercase().as_str() {
            "name" => Some(Self::Name),
            "number" => Some(Self::Number),
            "birth_date" | "birthdate" => Some(Self::BirthDate),
            "generation" => Some(Self::Generation),
            _ => None,
        }
    }
}

/// Sort the roster in place. Ties fall back to id so the order is stable
/// across requests.
pub fn sort_members(members: &mut [Member], key: MemberSort, descending: bool) {
    members.sort_by(|a, b| {
        let ord = match key {
            MemberSort::Name => a.name.cmp(&b.name),
            MemberSort::Number => a.number.cmp(&b.number),
            MemberSort::BirthDate => a.birth_date.cmp(&b.birth_date),
            MemberSort::Generation => a.generation.cmp(&b.generation),
        };
        let ord = if descending { ord.reverse() } else { ord };
        ord.then(a.id.cmp(&b.id))
    });
}

pub async fn list_members(
    State(state): State<AppState>,
    Query(params): Query<ListMembersParams>,
) -> Result<Json<Vec<Member>>, ApiError> {
    let team = params
        .team
        .as_deref()
        .map(str::parse::<Team>)
        .transpose()
        .map_err(ApiError::BadRequest)?;

    let sort = match params.sort.as_deref() {
        Some(raw) => MemberSort::parse(raw)
            .ok_or_else(|| ApiError::BadRequest(format!("unknown sort key: {}", raw)))?,
        None => MemberSort::Name,
    };

    let descending = match params.order.as_deref() {
        None | Some("asc") => false,
        Some("desc") => true,
        Some(other) => {
            return Err(ApiError::BadRequest(format!(
                "order must be asc or desc, got {}",
                other
            )))
        }
    };

    let mut members = state.with_store(|store| store.list_members()).await?;
    if let Some(team) = team {
        members.retain(|m| m.team == team);
    }
    sort_members(&mut members, sort, descending);

    Ok(Json(members))
}

pub async fn create_member(
    State(state): State<AppState>,
    Json(draft): Json<NewMember>,
) -> Result<(StatusCode, Json<Member>), ApiError> {
    let member = state.with_store(move |store| store.create_member(draft)).await?;
    Ok((StatusCode::CREATED, Json(member)))
}

#[derive(Debug, Deserialize)]
pub struct UploadMembersRequest {
    pub members: Vec<NewMember>,
}

#[derive(Debug, Serialize)]
pub struct UploadMembersResponse {
    pub received: usize,
    pub created: usize,
    pub skipped: usize,
}

pub async fn upload_members(
    State(state): State<AppState>,
    Json(request): Json<UploadMembersRequest>,
) -> Result<Json<UploadMembersResponse>, ApiError> {
    let received = request.members.len();
    let created = state.with_store(move |store| store.import_members(request.members)).await?;

    Ok(Json(UploadMembersResponse {
        received,
        created,
        skipped: received - created,
    }))
}

pub async fn get_member(
    State(state): State<AppState>,
    Path(id): Path<MemberId>,
) -> Result<Json<Member>, ApiError> {
    Ok(Json(state.with_store(move |store| store.get_member(id)).await?))
}

pub async fn update_member(
    State(state): State<AppState>,
    Path(id): Path<MemberId>,
    Json(draft): Json<NewMember>,
) -> Result<Json<Member>, ApiError> {
    Ok(Json(state.with_store(move |store| store.update_member(id, draft)).await?))
}

pub async fn delete_member(
    State(state): State<AppState>,
    Path(id): Path<MemberId>,
) -> Result<StatusCode, ApiError> {
    state.with_store(move |store| store.delete_member(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::build_router;
    use crate::api::test_support::*;
    use axum::http::StatusCode;
    use serde_json::{json, Value};
    use tempfile::TempDir;

    fn member_body(name: &str, team: &str, number: u32, birth: &str, generation: u32) -> String {
        json!({
            "name": name,
            "phone_number": format!("010-{}", number),
            "team": team,
            "number": number,
            "birth_date": birth,
            "generation": generation,
        })
        .to_string()
    }

    fn names(json: &Value) -> Vec<String> {
        json.as_array()
            .unwrap()
            .iter()
            .map(|m| m["name"].as_str().unwrap().to_string())
            .collect()
    }

    #[tokio::test]
    async fn test_create_and_get_member() {
        let tmp = TempDir::new().unwrap();
        let app = build_router(setup_test_state(tmp.path()));

        let (status, created) = post_json(
            app.clone(),
            "/api/members",
            &member_body("Kim", "CHUNGDONG", 7, "1990-02-01", 3),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["id"], 1);

        let (status, fetched) = get_json(app, "/api/members/1").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched["name"], "Kim");
        assert_eq!(fetched["team"], "CHUNGDONG");
        assert_eq!(fetched["birth_date"], "1990-02-01");
    }

    #[tokio::test]
    async fn test_list_members_filter_and_sort() {
        let tmp = TempDir::new().unwrap();
        let app = build_router(setup_test_state(tmp.path()));

        for body in [
            member_body("Park", "CHUNGDONG", 9, "1985-01-01", 1),
            member_body("Choi", "JUNGBYUNG", 4, "1992-01-01", 2),
            member_body("Ahn", "CHUNGDONG", 11, "1999-01-01", 5),
        ] {
            post_json(app.clone(), "/api/members", &body).await;
        }

        let (_, all) = get_json(app.clone(), "/api/members").await;
        assert_eq!(names(&all), vec!["Ahn", "Choi", "Park"]);

        let (_, chungdong) = get_json(app.clone(), "/api/members?team=chungdong&sort=number").await;
        assert_eq!(names(&chungdong), vec!["Park", "Ahn"]);

        let (_, by_age) =
            get_json(app.clone(), "/api/members?sort=birth_date&order=desc").await;
        assert_eq!(names(&by_age), vec!["Ahn", "Choi", "Park"]);

        let (status, _) = get_json(app, "/api/members?sort=shoe_size").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_upload_members_skips_duplicates() {
        let tmp = TempDir::new().unwrap();
        let app = build_router(setup_test_state(tmp.path()));
        post_json(
            app.clone(),
            "/api/members",
            &member_body("Kim", "CHUNGDONG", 7, "1990-02-01", 3),
        )
        .await;

        let body = json!({
            "members": [
                {"name": "Kim", "phone_number": "010-7", "team": "CHUNGDONG", "number": 7, "birth_date": "900201", "generation": 3},
                {"name": "Lee", "phone_number": "010-8", "team": "JUNGBYUNG", "number": 8, "birth_date": "010505", "generation": 9},
            ]
        })
        .to_string();
        let (status, json) = post_json(app.clone(), "/api/members/upload", &body).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["created"], 1);
        assert_eq!(json["skipped"], 1);

        let (_, lee) = get_json(app, "/api/members/2").await;
        assert_eq!(lee["birth_date"], "2001-05-05");
    }

    #[tokio::test]
    async fn test_update_and_delete_member() {
        let tmp = TempDir::new().unwrap();
        let app = build_router(setup_test_state(tmp.path()));
        post_json(
            app.clone(),
            "/api/members",
            &member_body("Kim", "CHUNGDONG", 7, "1990-02-01", 3),
        )
        .await;

        let (status, updated) = send_json(
            app.clone(),
            "PUT",
            "/api/members/1",
            &member_body("Kim", "JUNGBYUNG", 10, "1990-02-01", 3),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["team"], "JUNGBYUNG");
        assert_eq!(updated["number"], 10);

        let (status, _) = delete_with_token(app.clone(), "/api/members/1", None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, _) = get_json(app, "/api/members/1").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_member_sort_parse() {
        assert_eq!(MemberSort::parse("Name"), Some(MemberSort::Name));
        assert_eq!(MemberSort::parse("birthDate"), Some(MemberSort::BirthDate));
        assert_eq!(MemberSort::parse("age"), None);
    }
}
