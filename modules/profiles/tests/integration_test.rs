//! Service-level tests over a real SeaORM store.
//!
//! Each test runs on a fresh in-memory SQLite DB with migrations applied.

mod common;

use std::sync::Arc;

use profiles::{
    contract::{
        client::ProfilesApi,
        error::ProfilesError,
        model::{
            GeoPoint, LawyerProfilePatch, LocationInput, NewRegistration, ProfilePatch,
            ProfileState, Role,
        },
    },
    domain::{error::DomainError, service::ServiceConfig},
    gateways::local::ProfilesLocalClient,
};

use common::{create_test_service, create_test_service_with};

fn registration(external_id: &str, email: &str, role: Option<&str>) -> NewRegistration {
    NewRegistration {
        external_id: external_id.to_string(),
        email: email.to_string(),
        role: role.map(str::to_string),
    }
}

#[tokio::test]
async fn register_update_then_lawyer_gate() {
    let svc = create_test_service().await;

    let created = svc
        .register(registration("u1", "a@x.com", Some("user")))
        .await
        .unwrap();
    assert_eq!(created.external_id, "u1");
    assert_eq!(created.photo_url, "default_image_url");
    assert_eq!(created.display_name, "User");
    assert!(created.location.is_none());
    assert_eq!(created.state(), ProfileState::Registered);

    let updated = svc
        .update_profile(
            "u1",
            ProfilePatch {
                location: Some(LocationInput::LatLng(vec![12.9, 77.6])),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.location.unwrap().coordinates(), [77.6, 12.9]);
    assert_eq!(updated.state(), ProfileState::Located);

    let err = svc
        .update_lawyer_profile(
            "u1",
            LawyerProfilePatch {
                years_of_experience: Some(5),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err, DomainError::lawyer_not_found_or_unauthorized("u1"));
}

#[tokio::test]
async fn register_is_idempotent_and_never_overwrites() {
    let svc = create_test_service().await;

    let first = svc
        .register(registration("u1", "a@x.com", Some("user")))
        .await
        .unwrap();
    let second = svc
        .register(registration("u1", "other@x.com", Some("lawyer")))
        .await
        .unwrap();

    assert_eq!(first, second);
    assert_eq!(second.email, "a@x.com");
    assert_eq!(second.role, Some(Role::User));
}

#[tokio::test]
async fn register_trims_inputs_and_keeps_role_absent() {
    let svc = create_test_service().await;
    let p = svc
        .register(registration("  u1 ", " a@x.com ", None))
        .await
        .unwrap();
    assert_eq!(p.external_id, "u1");
    assert_eq!(p.email, "a@x.com");
    assert_eq!(p.role, None);
}

#[tokio::test]
async fn duplicate_email_under_other_external_id_conflicts() {
    let svc = create_test_service().await;
    svc.register(registration("u1", "a@x.com", None))
        .await
        .unwrap();

    let err = svc
        .register(registration("u2", "a@x.com", None))
        .await
        .unwrap_err();
    assert_eq!(err, DomainError::email_already_exists("a@x.com"));

    // exactly one record remains and u2 was never created
    let err = svc.get_profile("u2").await.unwrap_err();
    assert_eq!(err, DomainError::profile_not_found("u2"));
    assert_eq!(svc.get_profile("u1").await.unwrap().email, "a@x.com");
}

#[tokio::test]
async fn concurrent_registration_yields_one_record() {
    let svc = create_test_service().await;

    let (a, b) = tokio::join!(
        svc.register(registration("u1", "a@x.com", Some("lawyer"))),
        svc.register(registration("u1", "a@x.com", Some("lawyer")))
    );
    let (a, b) = (a.unwrap(), b.unwrap());
    assert_eq!(a.id, b.id);
    assert_eq!(svc.get_profile("u1").await.unwrap().id, a.id);
}

#[tokio::test]
async fn registration_validation() {
    let svc = create_test_service().await;

    for (req, field) in [
        (registration("", "a@x.com", None), "externalId"),
        (registration("   ", "a@x.com", None), "externalId"),
        (registration("u1", "", None), "email"),
        (registration("u1", "not-an-email", None), "email"),
        (registration("u1", "a@x.com", Some("judge")), "role"),
    ] {
        match svc.register(req).await {
            Err(DomainError::Validation { field: f, .. }) => assert_eq!(f, field),
            other => panic!("expected validation error on {field}, got {other:?}"),
        }
    }
    assert!(svc.get_profile("u1").await.is_err());
}

#[tokio::test]
async fn partial_update_leaves_other_fields_untouched() {
    let svc = create_test_service().await;
    svc.register(registration("u1", "a@x.com", Some("user")))
        .await
        .unwrap();
    let before = svc
        .update_profile(
            "u1",
            ProfilePatch {
                age: Some(30),
                gender: Some("female".into()),
                location: Some(LocationInput::LatLng(vec![48.85, 2.35])),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let after = svc
        .update_profile(
            "u1",
            ProfilePatch {
                display_name: Some("Ada".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(after.display_name, "Ada");
    assert_eq!(after.id, before.id);
    assert_eq!(after.email, before.email);
    assert_eq!(after.age, Some(30));
    assert_eq!(after.gender.as_deref(), Some("female"));
    assert_eq!(after.role, before.role);
    assert_eq!(after.location, before.location);
    assert_eq!(after.photo_url, before.photo_url);
    assert_eq!(after.years_of_experience, before.years_of_experience);
    assert_eq!(after.qualification, before.qualification);
    assert_eq!(after.degree_image_url, before.degree_image_url);
    assert_eq!(after.created_at, before.created_at);
    assert!(after.updated_at >= before.updated_at);
}

#[tokio::test]
async fn coordinate_round_trip() {
    let svc = create_test_service().await;
    svc.register(registration("u1", "a@x.com", None))
        .await
        .unwrap();

    let p = svc
        .update_profile(
            "u1",
            ProfilePatch {
                location: Some(LocationInput::LatLng(vec![-33.87, 151.21])),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    let stored = p.location.unwrap();
    assert_eq!(stored.coordinates(), [151.21, -33.87]);
    assert_eq!(stored.to_lat_lng(), [-33.87, 151.21]);

    // re-read from the store, not just the update response
    let reread = svc.get_profile("u1").await.unwrap();
    assert_eq!(reread.location, Some(stored));
}

#[tokio::test]
async fn update_of_unknown_profile_is_not_found() {
    let svc = create_test_service().await;
    let err = svc
        .update_profile(
            "ghost",
            ProfilePatch {
                display_name: Some("x".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err, DomainError::profile_not_found("ghost"));
    assert!(svc.get_profile("ghost").await.is_err());
}

#[tokio::test]
async fn invalid_update_writes_nothing() {
    let svc = create_test_service().await;
    let before = svc
        .register(registration("u1", "a@x.com", None))
        .await
        .unwrap();

    let bad_patches = [
        ProfilePatch {
            display_name: Some("   ".into()),
            ..Default::default()
        },
        ProfilePatch {
            display_name: Some("Ada".into()),
            age: Some(-1),
            ..Default::default()
        },
        ProfilePatch {
            display_name: Some("Ada".into()),
            location: Some(LocationInput::LatLng(vec![12.9])),
            ..Default::default()
        },
        ProfilePatch {
            display_name: Some("Ada".into()),
            location: Some(LocationInput::LatLng(vec![91.0, 10.0])),
            ..Default::default()
        },
    ];
    for patch in bad_patches {
        let err = svc.update_profile("u1", patch).await.unwrap_err();
        assert!(err.is_validation(), "{err:?}");
    }

    assert_eq!(svc.get_profile("u1").await.unwrap(), before);
}

#[tokio::test]
async fn display_name_limit_comes_from_config() {
    let svc = create_test_service_with(ServiceConfig {
        max_display_name_length: 5,
        ..Default::default()
    })
    .await;
    svc.register(registration("u1", "a@x.com", None))
        .await
        .unwrap();

    assert!(svc
        .update_profile(
            "u1",
            ProfilePatch {
                display_name: Some("Grace".into()),
                ..Default::default()
            },
        )
        .await
        .is_ok());
    let err = svc
        .update_profile(
            "u1",
            ProfilePatch {
                display_name: Some("Grace Hopper".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation { ref field, .. } if field == "displayName"));
}

#[tokio::test]
async fn lawyer_update_applies_lawyer_fields() {
    let svc = create_test_service().await;
    svc.register(registration("l1", "law@x.com", Some("lawyer")))
        .await
        .unwrap();

    let p = svc
        .update_lawyer_profile(
            "l1",
            LawyerProfilePatch {
                display_name: Some("Counsel".into()),
                years_of_experience: Some(12),
                qualification: Some("LLM".into()),
                degree_image_url: Some("https://cdn.example.com/degree.png".into()),
                location: Some(LocationInput::Point(GeoPoint::new(77.6, 12.9))),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(p.display_name, "Counsel");
    assert_eq!(p.years_of_experience, 12);
    assert_eq!(p.qualification, "LLM");
    assert_eq!(p.degree_image_url, "https://cdn.example.com/degree.png");
    assert_eq!(p.location.unwrap().coordinates(), [77.6, 12.9]);
    assert_eq!(p.role, Some(Role::Lawyer));
    assert_eq!(p.photo_url, "default_image_url");
}

#[tokio::test]
async fn lawyer_update_uses_the_same_pair_convention() {
    let svc = create_test_service().await;
    svc.register(registration("l1", "law@x.com", Some("lawyer")))
        .await
        .unwrap();

    let p = svc
        .update_lawyer_profile(
            "l1",
            LawyerProfilePatch {
                location: Some(LocationInput::LatLng(vec![12.9, 77.6])),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(p.location.unwrap().coordinates(), [77.6, 12.9]);
}

#[tokio::test]
async fn lawyer_gate_rejects_other_roles_without_mutation() {
    let svc = create_test_service().await;
    let user = svc
        .register(registration("u1", "u@x.com", Some("user")))
        .await
        .unwrap();
    let admin = svc
        .register(registration("a1", "admin@x.com", Some("admin")))
        .await
        .unwrap();
    let no_role = svc
        .register(registration("n1", "n@x.com", None))
        .await
        .unwrap();

    for before in [user, admin, no_role] {
        let err = svc
            .update_lawyer_profile(
                &before.external_id,
                LawyerProfilePatch {
                    display_name: Some("Sneaky".into()),
                    years_of_experience: Some(40),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert_eq!(
            err,
            DomainError::lawyer_not_found_or_unauthorized(before.external_id.clone())
        );
        assert_eq!(svc.get_profile(&before.external_id).await.unwrap(), before);
    }
}

#[tokio::test]
async fn lawyer_update_never_creates() {
    let svc = create_test_service().await;
    let err = svc
        .update_lawyer_profile("ghost", LawyerProfilePatch::default())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DomainError::LawyerNotFoundOrUnauthorized { .. }
    ));
    assert!(svc.get_profile("ghost").await.is_err());
}

#[tokio::test]
async fn lawyer_field_validation() {
    let svc = create_test_service().await;
    let before = svc
        .register(registration("l1", "law@x.com", Some("lawyer")))
        .await
        .unwrap();

    let bad = [
        LawyerProfilePatch {
            years_of_experience: Some(81),
            ..Default::default()
        },
        LawyerProfilePatch {
            years_of_experience: Some(-2),
            ..Default::default()
        },
        LawyerProfilePatch {
            qualification: Some("x".repeat(201)),
            ..Default::default()
        },
        LawyerProfilePatch {
            photo_url: Some("not a url".into()),
            ..Default::default()
        },
        LawyerProfilePatch {
            degree_image_url: Some("/relative/path.png".into()),
            ..Default::default()
        },
    ];
    for patch in bad {
        let err = svc.update_lawyer_profile("l1", patch).await.unwrap_err();
        assert!(err.is_validation(), "{err:?}");
    }
    assert_eq!(svc.get_profile("l1").await.unwrap(), before);
}

#[tokio::test]
async fn local_client_maps_errors() {
    let client: Arc<dyn ProfilesApi> =
        Arc::new(ProfilesLocalClient::new(create_test_service().await));

    let p = client
        .register(registration("u1", "a@x.com", Some("user")))
        .await
        .unwrap();
    assert_eq!(client.get_profile("u1").await.unwrap(), p);

    assert_eq!(
        client.get_profile("nope").await.unwrap_err(),
        ProfilesError::not_found("nope")
    );
    assert_eq!(
        client
            .register(registration("u2", "a@x.com", None))
            .await
            .unwrap_err(),
        ProfilesError::conflict("a@x.com")
    );
    assert!(matches!(
        client
            .update_lawyer_profile("u1", LawyerProfilePatch::default())
            .await
            .unwrap_err(),
        ProfilesError::NotFoundOrUnauthorized { .. }
    ));
    assert!(matches!(
        client
            .update_profile(
                "u1",
                ProfilePatch {
                    age: Some(500),
                    ..Default::default()
                }
            )
            .await
            .unwrap_err(),
        ProfilesError::Validation { .. }
    ));
}
