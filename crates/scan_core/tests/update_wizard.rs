use scan_core::{
    update, update_with_limit, AreaKind, AreaOfInterest, Cluster, ClusterState, Effect,
    GeoPoint, Msg, NoticeLevel, ProviderPolicy, ScanDraft, WizardState,
};

fn austin_box() -> AreaOfInterest {
    AreaOfInterest::BoundingBox {
        min_lat: 30.20,
        min_lon: -97.82,
        max_lat: 30.33,
        max_lon: -97.64,
    }
}

#[test]
fn area_edits_mark_state_dirty_without_effects() {
    let (mut state, effects) = update(WizardState::new(), Msg::AreaChanged(austin_box()));

    assert!(effects.is_empty());
    assert!(state.consume_dirty());
    assert!(!state.consume_dirty());

    let view = state.view();
    assert_eq!(view.area_kind, Some(AreaKind::BoundingBox));
    assert!(view.can_submit);
    assert_eq!(view.geometry_error, None);
}

#[test]
fn view_shows_the_area_extent() {
    let (state, _) = update(WizardState::new(), Msg::AreaChanged(austin_box()));
    let extent = state.view().extent.expect("extent");
    assert_eq!(extent.min_lat, 30.20);
    assert_eq!(extent.max_lat, 30.33);
    assert_eq!(extent.min_lon, -97.82);
    assert_eq!(extent.max_lon, -97.64);

    let circle = AreaOfInterest::CenterRadius {
        center: GeoPoint::new(30.2672, -97.7431),
        radius_miles: 6.9,
    };
    let (state, _) = update(state, Msg::AreaChanged(circle));
    let extent = state.view().extent.expect("extent");
    assert!((extent.max_lat - 30.3672).abs() < 1e-6);
    assert!((extent.min_lat - 30.1672).abs() < 1e-6);

    let (state, _) = update(state, Msg::AreaCleared);
    assert_eq!(state.view().extent, None);
}

#[test]
fn clearing_the_area_disables_launch() {
    let (state, _) = update(WizardState::new(), Msg::AreaChanged(austin_box()));
    let (state, _) = update(state, Msg::AreaCleared);

    let view = state.view();
    assert!(!view.can_submit);
    assert_eq!(
        view.geometry_error.as_deref(),
        Some("no area of interest has been defined")
    );
}

#[test]
fn tile_estimate_is_compared_with_max_tiles() {
    let (state, _) = update(WizardState::new(), Msg::AreaChanged(austin_box()));
    assert_eq!(state.view().estimated_tiles, Some(63));
    assert!(!state.view().exceeds_tile_limit);

    let policy = ProviderPolicy {
        max_tiles: 50,
        ..ProviderPolicy::default()
    };
    let (state, _) = update(state, Msg::PolicyChanged(policy));
    let view = state.view();
    assert!(view.exceeds_tile_limit);
    // Advisory only.
    assert!(view.can_submit);
}

#[test]
fn loaded_draft_round_trips_through_state() {
    let mut draft = ScanDraft::new(AreaOfInterest::CenterRadius {
        center: GeoPoint::new(30.2672, -97.7431),
        radius_miles: 10.0,
    });
    draft.budget_cents = 7_500;
    draft.enrichment.storm_history = true;

    let (state, _) = update(WizardState::new(), Msg::DraftLoaded(draft.clone()));
    assert_eq!(state.draft(), Some(draft));
    assert_eq!(state.view().area_kind, Some(AreaKind::CenterRadius));
}

#[test]
fn submitted_request_carries_every_wizard_input() {
    let (state, _) = update(WizardState::new(), Msg::AreaChanged(austin_box()));
    let (state, _) = update(state, Msg::BudgetChanged(1_234));
    let (_state, effects) = update(state, Msg::SubmitClicked);

    let Some(Effect::SubmitJob { request, .. }) = effects.first() else {
        panic!("expected submit effect, got {effects:?}");
    };
    assert_eq!(request.budget_cents, 1_234);
    assert_eq!(request.area_type, AreaKind::BoundingBox);
    assert_eq!(request.area_payload.spacing(), 0.02);
}

#[test]
fn cluster_request_is_one_shot() {
    let (state, _) = update(WizardState::new(), Msg::AreaChanged(austin_box()));
    let (state, effects) = update_with_limit(state, Msg::ClustersRequested, 15);

    let [Effect::RequestClusters { request, query }] = effects.as_slice() else {
        panic!("expected one cluster request, got {effects:?}");
    };
    assert_eq!(*request, 1);
    assert_eq!(query.limit, 15);
    assert_eq!(query.area_geojson.coordinates[0].len(), 5);
    assert_eq!(state.clusters(), &ClusterState::Loading);

    let cluster = Cluster {
        id: Some("c1".to_string()),
        center: GeoPoint::new(30.25, -97.7),
        lead_count: 12,
        score: 0.8,
        radius_miles: Some(1.5),
    };
    let (state, effects) = update(
        state,
        Msg::ClustersLoaded {
            request: 1,
            result: Ok(vec![cluster.clone()]),
        },
    );
    assert!(effects.is_empty());
    assert_eq!(state.view().clusters, ClusterState::Success(vec![cluster]));
}

#[test]
fn empty_cluster_list_is_success() {
    let (state, _) = update(WizardState::new(), Msg::AreaChanged(austin_box()));
    let (state, _) = update(state, Msg::ClustersRequested);
    let (state, _) = update(
        state,
        Msg::ClustersLoaded {
            request: 1,
            result: Ok(Vec::new()),
        },
    );

    assert_eq!(state.clusters(), &ClusterState::Success(Vec::new()));
}

#[test]
fn cluster_error_and_stale_answers() {
    let (state, _) = update(WizardState::new(), Msg::AreaChanged(austin_box()));
    let (state, _) = update(state, Msg::ClustersRequested);
    let (state, _) = update(state, Msg::ClustersRequested);

    // The first request was superseded.
    let (state, _) = update(
        state,
        Msg::ClustersLoaded {
            request: 1,
            result: Ok(Vec::new()),
        },
    );
    assert_eq!(state.clusters(), &ClusterState::Loading);

    let (state, _) = update(
        state,
        Msg::ClustersLoaded {
            request: 2,
            result: Err("http status 500".to_string()),
        },
    );
    assert_eq!(
        state.clusters(),
        &ClusterState::Error("http status 500".to_string())
    );
}

#[test]
fn clusters_need_a_valid_area() {
    let (state, effects) = update(WizardState::new(), Msg::ClustersRequested);

    assert_eq!(state.clusters(), &ClusterState::NotRequested);
    assert!(matches!(
        effects.as_slice(),
        [Effect::Notify {
            level: NoticeLevel::Warning,
            ..
        }]
    ));
}
