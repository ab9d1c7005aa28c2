use std::{sync::Arc, time::Duration};

use workspace_datasource_api::workspace_datasource::domain::{
    model::enums::workspace_datasource_domain_error::WorkspaceDatasourceDomainError,
    services::workspace_datasource_factory::WorkspaceDatasourceFactory,
};

use crate::support::{
    HarnessOptions, create_command, create_harness, create_harness_with, wait_for_supersession,
};

#[tokio::test]
async fn concurrent_creates_for_the_same_version_share_one_build() {
    let harness = create_harness_with(HarnessOptions {
        build_delay: Duration::from_millis(50),
        ..HarnessOptions::default()
    });
    harness.metadata_facade.set_version("acme", 3);

    let (first, second) = tokio::join!(
        harness.factory.create(create_command("acme", None, true)),
        harness.factory.create(create_command("acme", None, true)),
    );

    let first = first.expect("create should succeed");
    let second = second.expect("create should succeed");
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(first.metadata_version().value(), 3);
    assert_eq!(first.schema_name().value(), "workspace_acme");
    assert_eq!(harness.connection_builder.build_calls(), 1);
}

#[tokio::test]
async fn create_with_matching_expected_version_succeeds() {
    let harness = create_harness();
    harness.metadata_facade.set_version("acme", 6);

    let data_source = harness
        .factory
        .create(create_command("acme", Some(6), true))
        .await
        .expect("create should succeed");

    assert_eq!(data_source.metadata_version().value(), 6);
}

#[tokio::test]
async fn create_rejects_a_stale_expected_version() {
    let harness = create_harness();
    harness.metadata_facade.set_version("acme", 6);

    let result = harness
        .factory
        .create(create_command("acme", Some(5), true))
        .await;

    assert!(matches!(
        result,
        Err(WorkspaceDatasourceDomainError::MetadataVersionMismatch {
            current: 6,
            expected: 5,
            ..
        })
    ));
    assert_eq!(harness.connection_builder.build_calls(), 0);
}

#[tokio::test]
async fn strict_create_with_unknown_version_fails_without_building() {
    let harness = create_harness();
    harness.metadata_facade.publish_on_recompute("acme", 3);

    let result = harness
        .factory
        .create(create_command("acme", None, true))
        .await;

    assert!(matches!(
        result,
        Err(WorkspaceDatasourceDomainError::MetadataVersionNotFound { ref workspace_id })
            if workspace_id == "acme"
    ));
    assert_eq!(
        harness.metadata_facade.recompute_calls(),
        vec![("acme".to_string(), false)]
    );
    assert_eq!(harness.connection_builder.build_calls(), 0);
}

#[tokio::test]
async fn lenient_create_recomputes_and_uses_the_published_version() {
    let harness = create_harness();
    harness.metadata_facade.publish_on_recompute("acme", 4);

    let data_source = harness
        .factory
        .create(create_command("acme", None, false))
        .await
        .expect("create should succeed after recompute");

    assert_eq!(data_source.metadata_version().value(), 4);
    assert_eq!(
        harness.metadata_facade.recompute_calls(),
        vec![("acme".to_string(), true)]
    );
}

#[tokio::test]
async fn lenient_create_fails_when_recompute_publishes_nothing() {
    let harness = create_harness();

    let result = harness
        .factory
        .create(create_command("acme", None, false))
        .await;

    assert!(matches!(
        result,
        Err(WorkspaceDatasourceDomainError::MetadataVersionNotFound { .. })
    ));
    assert_eq!(harness.connection_builder.build_calls(), 0);
}

#[tokio::test]
async fn strict_create_reports_not_found_when_recompute_is_locked() {
    let harness = create_harness();
    harness
        .metadata_facade
        .fail_recompute_with(WorkspaceDatasourceDomainError::MetadataRecomputeLocked {
            workspace_id: "acme".to_string(),
        });

    let result = harness
        .factory
        .create(create_command("acme", None, true))
        .await;

    assert!(matches!(
        result,
        Err(WorkspaceDatasourceDomainError::MetadataVersionNotFound { ref workspace_id })
            if workspace_id == "acme"
    ));
    assert_eq!(harness.connection_builder.build_calls(), 0);
}

#[tokio::test]
async fn lenient_create_propagates_a_failing_recompute() {
    let harness = create_harness();
    harness
        .metadata_facade
        .fail_recompute_with(WorkspaceDatasourceDomainError::InfrastructureError(
            "metadata store unreachable".to_string(),
        ));

    let result = harness
        .factory
        .create(create_command("acme", None, false))
        .await;

    assert!(matches!(
        result,
        Err(WorkspaceDatasourceDomainError::InfrastructureError(_))
    ));
}

#[tokio::test]
async fn failed_build_is_reported_and_retried_on_next_create() {
    let harness = create_harness();
    harness.metadata_facade.set_version("acme", 3);
    harness.connection_builder.fail_next_builds(1);

    let failed = harness
        .factory
        .create(create_command("acme", None, true))
        .await;

    match failed {
        Err(WorkspaceDatasourceDomainError::BuildFailure {
            workspace_id,
            version,
            reason,
        }) => {
            assert_eq!(workspace_id, "acme");
            assert_eq!(version, 3);
            assert!(reason.contains("connection refused"));
        }
        other => panic!("expected build failure, got {other:?}"),
    }
    assert_eq!(harness.factory.cached_datasource_count(), 0);

    harness
        .factory
        .create(create_command("acme", None, true))
        .await
        .expect("retry should build again");
    assert_eq!(harness.connection_builder.build_calls(), 2);
}

#[tokio::test]
async fn missing_data_source_row_fails_with_schema_not_found() {
    let harness = create_harness_with(HarnessOptions {
        workspaces_with_data_source: vec![],
        ..HarnessOptions::default()
    });
    harness.metadata_facade.set_version("acme", 3);

    let result = harness
        .factory
        .create(create_command("acme", None, true))
        .await;

    assert!(matches!(
        result,
        Err(WorkspaceDatasourceDomainError::WorkspaceSchemaNotFound { .. })
    ));
    assert_eq!(harness.connection_builder.build_calls(), 0);
}

#[tokio::test]
async fn missing_object_metadata_fails_with_collection_not_found() {
    let harness = create_harness();
    harness.metadata_facade.set_version("acme", 3);
    harness.metadata_facade.drop_object_metadata();

    let result = harness
        .factory
        .create(create_command("acme", None, true))
        .await;

    assert!(matches!(
        result,
        Err(WorkspaceDatasourceDomainError::MetadataCollectionNotFound { version: 3, .. })
    ));
    assert_eq!(harness.factory.cached_entity_mapping_count(), 0);
}

#[tokio::test]
async fn slow_build_times_out_as_build_failure() {
    let harness = create_harness_with(HarnessOptions {
        build_delay: Duration::from_millis(200),
        build_timeout: Duration::from_millis(20),
        ..HarnessOptions::default()
    });
    harness.metadata_facade.set_version("acme", 3);

    let result = harness
        .factory
        .create(create_command("acme", None, true))
        .await;

    assert!(matches!(
        result,
        Err(WorkspaceDatasourceDomainError::BuildFailure { ref reason, .. })
            if reason.contains("timed out")
    ));
    assert_eq!(harness.factory.cached_datasource_count(), 0);
}

#[tokio::test]
async fn newer_version_supersedes_the_older_datasource() {
    let harness = create_harness();
    harness.metadata_facade.set_version("acme", 3);
    let old = harness
        .factory
        .create(create_command("acme", None, true))
        .await
        .expect("create at version 3");

    harness.metadata_facade.set_version("acme", 4);
    let new = harness
        .factory
        .create(create_command("acme", None, true))
        .await
        .expect("create at version 4");
    wait_for_supersession().await;

    assert!(!Arc::ptr_eq(&old, &new));
    assert!(old.pool().is_closed());
    assert!(!new.pool().is_closed());
    assert_eq!(
        harness.connection_builder.disposed(),
        vec![("acme".to_string(), 3)]
    );
    assert_eq!(harness.factory.cached_datasource_count(), 1);
    assert_eq!(harness.factory.cached_entity_mapping_count(), 1);
}

#[tokio::test]
async fn stale_build_finishing_after_a_newer_version_is_disposed() {
    let harness = create_harness();
    harness.metadata_facade.set_version("acme", 2);
    let current = harness
        .factory
        .create(create_command("acme", None, true))
        .await
        .expect("create at version 2");

    // A caller that still reads version 1 finishes its build afterwards.
    harness.metadata_facade.set_version("acme", 1);
    let stale = harness
        .factory
        .create(create_command("acme", None, true))
        .await
        .expect("create at version 1");
    wait_for_supersession().await;

    assert!(stale.pool().is_closed());
    assert!(!current.pool().is_closed());
    assert_eq!(
        harness.connection_builder.disposed(),
        vec![("acme".to_string(), 1)]
    );
    assert_eq!(harness.factory.cached_datasource_count(), 1);

    harness.metadata_facade.set_version("acme", 2);
    let again = harness
        .factory
        .create(create_command("acme", None, true))
        .await
        .expect("create at version 2 again");
    assert!(Arc::ptr_eq(&current, &again));
    assert_eq!(harness.connection_builder.build_calls(), 2);
}

#[tokio::test]
async fn slow_disposal_of_a_superseded_version_does_not_block_create() {
    let harness = create_harness();
    harness.metadata_facade.set_version("acme", 3);
    let old = harness
        .factory
        .create(create_command("acme", None, true))
        .await
        .expect("create at version 3");
    harness
        .connection_builder
        .slow_down_disposal(Duration::from_secs(30));

    harness.metadata_facade.set_version("acme", 4);
    let new = tokio::time::timeout(
        Duration::from_secs(1),
        harness.factory.create(create_command("acme", None, true)),
    )
    .await
    .expect("create must not wait for the old pool to close")
    .expect("create at version 4");
    wait_for_supersession().await;

    assert_eq!(new.metadata_version().value(), 4);
    assert!(!old.pool().is_closed());
    assert_eq!(
        harness.connection_builder.disposed(),
        vec![("acme".to_string(), 3)]
    );

    let cached = harness
        .factory
        .create(create_command("acme", None, true))
        .await
        .expect("cached version 4");
    assert!(Arc::ptr_eq(&new, &cached));
}

#[tokio::test]
async fn other_workspaces_are_not_superseded() {
    let harness = create_harness();
    harness.metadata_facade.set_version("acme", 3);
    harness.metadata_facade.set_version("globex", 9);

    harness
        .factory
        .create(create_command("globex", None, true))
        .await
        .expect("create globex");
    harness
        .factory
        .create(create_command("acme", None, true))
        .await
        .expect("create acme");
    wait_for_supersession().await;

    assert!(harness.connection_builder.disposed().is_empty());
    assert_eq!(harness.factory.cached_datasource_count(), 2);
}

#[tokio::test]
async fn entity_mappings_follow_object_metadata() {
    let harness = create_harness();
    harness.metadata_facade.set_version("acme", 3);

    let data_source = harness
        .factory
        .create(create_command("acme", None, true))
        .await
        .expect("create should succeed");

    let mappings = data_source.entity_mappings();
    assert_eq!(mappings.len(), 2);
    assert_eq!(mappings.metadata_version().value(), 3);

    let person = mappings.get("person").expect("person mapping");
    assert_eq!(person.table_name, "person");
    assert_eq!(person.columns.len(), 2);

    let pet = mappings.get("pet").expect("pet mapping");
    assert_eq!(pet.table_name, "_pet");
    assert!(!pet.columns[0].is_nullable);
}
