use ::common::Role;
use serde_json::json;

use crate::common::{TestApp, routes};

mod profile {
    use super::*;

    #[tokio::test]
    async fn student_can_create_and_read_profile() {
        let app = TestApp::spawn().await;
        let (token, id) = app.create_student("alice", "21CS001").await;

        let res = app.get_with_token(routes::STUDENT_INFO, &token).await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["id"], id);
        assert_eq!(res.body["username"], "alice");
        assert_eq!(res.body["register_number"], "21CS001");
        assert_eq!(res.body["attendance_percentage"], 0.0);
    }

    #[tokio::test]
    async fn info_without_profile_is_not_found() {
        let app = TestApp::spawn().await;
        let token = app.create_user("alice", Role::Student).await;

        let res = app.get_with_token(routes::STUDENT_INFO, &token).await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn second_profile_for_same_account_conflicts() {
        let app = TestApp::spawn().await;
        let (token, _) = app.create_student("alice", "21CS001").await;

        let res = app
            .post_with_token(
                routes::STUDENT_CREATE,
                &json!({
                    "name": "Alice again",
                    "class": "CSE-B",
                    "register_number": "21CS999",
                    "email": "alice@example.edu",
                    "phone": "123",
                }),
                &token,
            )
            .await;

        assert_eq!(res.status, 409);
        assert_eq!(res.body["code"], "CONFLICT");
    }

    #[tokio::test]
    async fn register_number_must_be_unique() {
        let app = TestApp::spawn().await;
        app.create_student("alice", "21CS001").await;
        let bob = app.create_user("bob", Role::Student).await;

        let res = app
            .post_with_token(
                routes::STUDENT_CREATE,
                &json!({
                    "name": "Bob",
                    "class": "CSE-A",
                    "register_number": "21CS001",
                    "email": "bob@example.edu",
                    "phone": "123",
                }),
                &bob,
            )
            .await;

        assert_eq!(res.status, 409);
        assert_eq!(res.body["code"], "CONFLICT");
    }

    #[tokio::test]
    async fn invalid_email_is_rejected() {
        let app = TestApp::spawn().await;
        let token = app.create_user("alice", Role::Student).await;

        let res = app
            .post_with_token(
                routes::STUDENT_CREATE,
                &json!({
                    "name": "Alice",
                    "class": "CSE-A",
                    "register_number": "21CS001",
                    "email": "not-an-email",
                    "phone": "123",
                }),
                &token,
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }
}

mod attendance_listing {
    use super::*;

    #[tokio::test]
    async fn student_sees_only_own_attendance_in_date_order() {
        let app = TestApp::spawn().await;
        let admin = app.create_user("root", Role::Admin).await;
        let (alice, alice_id) = app.create_student("alice", "21CS001").await;
        let (_, bob_id) = app.create_student("bob", "21CS002").await;

        app.record_attendance(&admin, alice_id, "2024-01-11", "P1", "T7", true)
            .await;
        app.record_attendance(&admin, alice_id, "2024-01-10", "P2", "T7", false)
            .await;
        app.record_attendance(&admin, bob_id, "2024-01-10", "P1", "T7", true)
            .await;

        let res = app.get_with_token(routes::STUDENT_ATTENDANCE, &alice).await;

        assert_eq!(res.status, 200, "{}", res.text);
        let rows = res.body.as_array().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["date"], "2024-01-10");
        assert_eq!(rows[1]["date"], "2024-01-11");
        assert!(rows.iter().all(|r| r["student_id"] == alice_id));
    }
}
