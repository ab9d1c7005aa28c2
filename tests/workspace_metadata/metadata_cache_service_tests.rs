use std::time::Duration;

use workspace_datasource_api::{
    shared::domain::model::value_objects::metadata_version::MetadataVersion,
    workspace_metadata::domain::{
        model::enums::workspace_metadata_domain_error::WorkspaceMetadataDomainError,
        services::workspace_metadata_cache_service::WorkspaceMetadataCacheService,
    },
};

use crate::support::{create_harness, recompute_command, workspace_id};

fn version(value: i64) -> MetadataVersion {
    MetadataVersion::new(value).expect("valid metadata version")
}

#[tokio::test]
async fn version_is_unknown_until_recomputed() {
    let harness = create_harness(Duration::ZERO);
    harness.repository.set_version("acme", 7);

    let cached = harness
        .service
        .get_metadata_version(&workspace_id("acme"))
        .await
        .expect("lookup should succeed");

    assert_eq!(cached, None);
    assert_eq!(harness.repository.stats(), (0, 0));
}

#[tokio::test]
async fn recompute_publishes_version_and_object_metadata() {
    let harness = create_harness(Duration::ZERO);
    harness.repository.set_version("acme", 7);

    let published = harness
        .service
        .recompute_metadata_cache(recompute_command("acme", false))
        .await
        .expect("recompute should succeed");

    assert_eq!(published, Some(version(7)));
    assert_eq!(
        harness
            .service
            .get_metadata_version(&workspace_id("acme"))
            .await
            .expect("lookup should succeed"),
        Some(version(7))
    );

    let maps = harness
        .service
        .get_object_metadata_maps(&workspace_id("acme"), version(7))
        .await
        .expect("lookup should succeed")
        .expect("maps should be published");
    let company = maps
        .get_by_name_singular("company")
        .expect("company object");
    assert_eq!(company.name_plural, "companies");
    assert!(maps.get_by_id(&company.id).is_some());
}

#[tokio::test]
async fn version_zero_publishes_nothing() {
    let harness = create_harness(Duration::ZERO);
    harness.repository.set_version("acme", 0);

    let published = harness
        .service
        .recompute_metadata_cache(recompute_command("acme", false))
        .await
        .expect("recompute should succeed");

    assert_eq!(published, None);
    assert_eq!(
        harness
            .service
            .get_metadata_version(&workspace_id("acme"))
            .await
            .expect("lookup should succeed"),
        None
    );
    assert_eq!(harness.repository.stats(), (1, 0));
}

#[tokio::test]
async fn concurrent_recompute_is_rejected_while_locked() {
    let harness = create_harness(Duration::from_millis(50));
    harness.repository.set_version("acme", 7);

    let (first, second) = tokio::join!(
        harness
            .service
            .recompute_metadata_cache(recompute_command("acme", false)),
        async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            harness
                .service
                .recompute_metadata_cache(recompute_command("acme", false))
                .await
        }
    );

    assert_eq!(first.expect("first recompute should succeed"), Some(version(7)));
    assert!(matches!(
        second,
        Err(WorkspaceMetadataDomainError::RecomputeLocked(ref workspace_id)) if workspace_id == "acme"
    ));
}

#[tokio::test]
async fn ignore_lock_proceeds_under_contention() {
    let harness = create_harness(Duration::from_millis(50));
    harness.repository.set_version("acme", 7);

    let (first, second) = tokio::join!(
        harness
            .service
            .recompute_metadata_cache(recompute_command("acme", false)),
        async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            harness
                .service
                .recompute_metadata_cache(recompute_command("acme", true))
                .await
        }
    );

    assert_eq!(first.expect("first recompute"), Some(version(7)));
    assert_eq!(second.expect("lock ignored"), Some(version(7)));
}

#[tokio::test]
async fn locks_are_per_workspace() {
    let harness = create_harness(Duration::from_millis(50));
    harness.repository.set_version("acme", 7);
    harness.repository.set_version("globex", 2);

    let (acme, globex) = tokio::join!(
        harness
            .service
            .recompute_metadata_cache(recompute_command("acme", false)),
        harness
            .service
            .recompute_metadata_cache(recompute_command("globex", false)),
    );

    assert_eq!(acme.expect("acme recompute"), Some(version(7)));
    assert_eq!(globex.expect("globex recompute"), Some(version(2)));
}

#[tokio::test]
async fn unchanged_version_does_not_reload_object_metadata() {
    let harness = create_harness(Duration::ZERO);
    harness.repository.set_version("acme", 7);

    for _ in 0..2 {
        harness
            .service
            .recompute_metadata_cache(recompute_command("acme", false))
            .await
            .expect("recompute should succeed");
    }

    assert_eq!(harness.repository.stats(), (2, 1));
}

#[tokio::test]
async fn new_version_drops_object_metadata_of_the_old_one() {
    let harness = create_harness(Duration::ZERO);
    harness.repository.set_version("acme", 7);
    harness
        .service
        .recompute_metadata_cache(recompute_command("acme", false))
        .await
        .expect("recompute at version 7");

    harness.repository.set_version("acme", 8);
    harness
        .service
        .recompute_metadata_cache(recompute_command("acme", false))
        .await
        .expect("recompute at version 8");

    let acme = workspace_id("acme");
    assert!(
        harness
            .service
            .get_object_metadata_maps(&acme, version(7))
            .await
            .expect("lookup should succeed")
            .is_none()
    );
    assert!(
        harness
            .service
            .get_object_metadata_maps(&acme, version(8))
            .await
            .expect("lookup should succeed")
            .is_some()
    );
}

#[tokio::test]
async fn failed_recompute_releases_the_lock() {
    let harness = create_harness(Duration::ZERO);
    harness.repository.set_version("acme", 7);
    harness.repository.set_failing(true);

    let failed = harness
        .service
        .recompute_metadata_cache(recompute_command("acme", false))
        .await;
    assert!(matches!(
        failed,
        Err(WorkspaceMetadataDomainError::InfrastructureError(_))
    ));

    harness.repository.set_failing(false);
    let published = harness
        .service
        .recompute_metadata_cache(recompute_command("acme", false))
        .await
        .expect("lock should have been released");
    assert_eq!(published, Some(version(7)));
}
