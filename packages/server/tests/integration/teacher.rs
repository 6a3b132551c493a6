use ::common::Role;
use attendance_server::entity::attendance;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use serde_json::{Value, json};

use crate::common::{TestApp, TestResponse, routes};

/// A claim by `alice` over slots recorded by teachers `T7` (P1) and `T8` (P2).
struct Scenario {
    app: TestApp,
    student: String,
    t7: String,
    t8: String,
    claim: Value,
}

impl Scenario {
    async fn new() -> Self {
        let app = TestApp::spawn().await;
        let admin = app.create_user("root", Role::Admin).await;
        let t7 = app.create_user("T7", Role::Teacher).await;
        let t8 = app.create_user("T8", Role::Teacher).await;
        let (student, student_id) = app.create_student("alice", "21CS001").await;
        app.record_attendance(&admin, student_id, "2024-01-10", "P1", "T7", false)
            .await;
        app.record_attendance(&admin, student_id, "2024-01-10", "P2", "T8", false)
            .await;

        let res = app
            .submit_claim(&student, &["2024-01-10_P1", "2024-01-10_P2"])
            .await;
        assert_eq!(res.status, 201, "{}", res.text);

        Self {
            app,
            student,
            t7,
            t8,
            claim: res.body,
        }
    }

    fn claim_id(&self) -> i64 {
        self.claim["id"].as_i64().unwrap()
    }

    fn review_id_for(&self, teacher: &str) -> i64 {
        self.claim["reviews"]
            .as_array()
            .unwrap()
            .iter()
            .find(|r| r["teacher_id"] == teacher)
            .and_then(|r| r["id"].as_i64())
            .unwrap()
    }

    async fn decide(&self, token: &str, review_id: i64, approved: bool) -> TestResponse {
        self.app
            .put_with_token(
                &routes::teacher_claim(self.claim_id()),
                &json!({"review_id": review_id, "approved": approved, "message": "Checked"}),
                token,
            )
            .await
    }
}

mod profile {
    use super::*;

    #[tokio::test]
    async fn teacher_can_create_and_read_profile() {
        let app = TestApp::spawn().await;
        let token = app.create_user("T7", Role::Teacher).await;

        let created = app
            .post_with_token(routes::TEACHER_CREATE, &json!({"name": "Dr. Rao"}), &token)
            .await;
        assert_eq!(created.status, 201, "{}", created.text);

        let res = app.get_with_token(routes::TEACHER_SELF, &token).await;
        assert_eq!(res.status, 200);
        assert_eq!(res.body["username"], "T7");
        assert_eq!(res.body["name"], "Dr. Rao");
    }

    #[tokio::test]
    async fn second_profile_conflicts() {
        let app = TestApp::spawn().await;
        let token = app.create_user("T7", Role::Teacher).await;
        app.post_with_token(routes::TEACHER_CREATE, &json!({"name": "Dr. Rao"}), &token)
            .await;

        let res = app
            .post_with_token(routes::TEACHER_CREATE, &json!({"name": "Again"}), &token)
            .await;

        assert_eq!(res.status, 409);
        assert_eq!(res.body["code"], "CONFLICT");
    }

    #[tokio::test]
    async fn self_without_profile_is_not_found() {
        let app = TestApp::spawn().await;
        let token = app.create_user("T7", Role::Teacher).await;

        let res = app.get_with_token(routes::TEACHER_SELF, &token).await;

        assert_eq!(res.status, 404);
    }
}

mod inbox {
    use super::*;

    #[tokio::test]
    async fn teacher_sees_only_reviews_addressed_to_them() {
        let s = Scenario::new().await;

        let res = s.app.get_with_token(routes::TEACHER_CLAIMS, &s.t7).await;

        assert_eq!(res.status, 200, "{}", res.text);
        let items = res.body.as_array().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["review"]["teacher_id"], "T7");
        assert_eq!(items[0]["reason"], "Fever");
        assert_eq!(items[0]["claim_status"], "Pending");
    }

    #[tokio::test]
    async fn status_filter_narrows_the_inbox() {
        let s = Scenario::new().await;
        s.decide(&s.t7, s.review_id_for("T7"), true).await;

        let pending = s
            .app
            .get_with_token(&format!("{}?status=Pending", routes::TEACHER_CLAIMS), &s.t7)
            .await;
        let approved = s
            .app
            .get_with_token(&format!("{}?status=Approved", routes::TEACHER_CLAIMS), &s.t7)
            .await;

        assert_eq!(pending.body.as_array().unwrap().len(), 0);
        assert_eq!(approved.body.as_array().unwrap().len(), 1);
    }
}

mod decisions {
    use super::*;

    #[tokio::test]
    async fn approval_updates_review_and_attendance_but_not_claim_status() {
        let s = Scenario::new().await;

        let res = s.decide(&s.t7, s.review_id_for("T7"), true).await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["status"], "Approved");
        assert_eq!(res.body["message"], "Checked");
        assert!(res.body["reviewed_at"].is_string());

        let claim = s
            .app
            .get_with_token(&routes::claim(s.claim_id()), &s.t7)
            .await;
        assert_eq!(claim.body["status"], "Pending");
        assert_eq!(claim.body["review_status"], "Pending");

        let rows = s
            .app
            .get_with_token(routes::STUDENT_ATTENDANCE, &s.student)
            .await;
        let rows = rows.body.as_array().unwrap();
        let p1 = rows.iter().find(|r| r["period"] == "P1").unwrap();
        let p2 = rows.iter().find(|r| r["period"] == "P2").unwrap();
        assert_eq!(p1["is_claimed"], true);
        assert_eq!(p2["is_claimed"], false);
    }

    #[tokio::test]
    async fn review_status_reflects_all_decisions() {
        let s = Scenario::new().await;
        s.decide(&s.t7, s.review_id_for("T7"), true).await;
        s.decide(&s.t8, s.review_id_for("T8"), false).await;

        let claim = s
            .app
            .get_with_token(&routes::claim(s.claim_id()), &s.t7)
            .await;

        assert_eq!(claim.body["review_status"], "Rejected");
        assert_eq!(claim.body["status"], "Pending");
    }

    #[tokio::test]
    async fn teacher_may_change_their_mind_before_finalization() {
        let s = Scenario::new().await;
        let review_id = s.review_id_for("T7");
        s.decide(&s.t7, review_id, true).await;

        let res = s.decide(&s.t7, review_id, false).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["status"], "Rejected");
        let rows = s
            .app
            .get_with_token(routes::STUDENT_ATTENDANCE, &s.student)
            .await;
        let p1 = rows
            .body
            .as_array()
            .unwrap()
            .iter()
            .find(|r| r["period"] == "P1")
            .cloned()
            .unwrap();
        assert_eq!(p1["is_claimed"], false);
    }

    #[tokio::test]
    async fn rejection_in_a_later_claim_keeps_earlier_approval_claimed() {
        let s = Scenario::new().await;
        s.decide(&s.t7, s.review_id_for("T7"), true).await;

        let second = s.app.submit_claim(&s.student, &["2024-01-10_P1"]).await;
        assert_eq!(second.status, 201, "{}", second.text);
        let second_review = second.body["reviews"][0]["id"].as_i64().unwrap();
        let res = s
            .app
            .put_with_token(
                &routes::teacher_claim(second.id()),
                &json!({"review_id": second_review, "approved": false}),
                &s.t7,
            )
            .await;
        assert_eq!(res.status, 200, "{}", res.text);

        let p1 = attendance::Entity::find()
            .filter(attendance::Column::Period.eq("P1"))
            .one(&s.app.db)
            .await
            .unwrap()
            .unwrap();
        assert!(p1.is_claimed);

        // Once the only approval is withdrawn the slot is no longer claimed.
        s.decide(&s.t7, s.review_id_for("T7"), false).await;
        let p1 = attendance::Entity::find_by_id(p1.id)
            .one(&s.app.db)
            .await
            .unwrap()
            .unwrap();
        assert!(!p1.is_claimed);
    }

    #[tokio::test]
    async fn review_addressed_to_another_teacher_is_not_found() {
        let s = Scenario::new().await;

        let res = s.decide(&s.t8, s.review_id_for("T7"), true).await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn review_of_another_claim_is_not_found() {
        let s = Scenario::new().await;
        let other = s.app.submit_claim(&s.student, &[]).await.id();

        let res = s
            .app
            .put_with_token(
                &routes::teacher_claim(other),
                &json!({"review_id": s.review_id_for("T7"), "approved": true}),
                &s.t7,
            )
            .await;

        assert_eq!(res.status, 404);
    }

    #[tokio::test]
    async fn finalized_claim_cannot_be_reviewed() {
        let s = Scenario::new().await;
        s.decide(&s.t7, s.review_id_for("T7"), true).await;
        s.decide(&s.t8, s.review_id_for("T8"), true).await;
        let ipm = s.app.create_user("ipm1", Role::Ipm).await;
        let finalized = s
            .app
            .put_with_token(
                &routes::ipm_claim(s.claim_id()),
                &json!({"status": "Approved"}),
                &ipm,
            )
            .await;
        assert_eq!(finalized.status, 200, "{}", finalized.text);

        let res = s.decide(&s.t7, s.review_id_for("T7"), false).await;

        assert_eq!(res.status, 409);
        assert_eq!(res.body["code"], "CONFLICT");
    }

    #[tokio::test]
    async fn student_cannot_review() {
        let s = Scenario::new().await;

        let res = s.decide(&s.student, s.review_id_for("T7"), true).await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "PERMISSION_DENIED");
    }
}
