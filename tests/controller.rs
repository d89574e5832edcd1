use rosterview::domain::PersonId;
use rosterview::pipeline::RequestId;
use rosterview::ui::BannerKind;
use rosterview::worker::WorkerMessage;
use rosterview::{handle_event, initialize, Action, AppState, Config, Event, Field};

const FIRST_BATCH: &str = r#"{
    "results": [
        {"name": {"first": "Ava", "last": "Lund"}, "login": {"uuid": "u-1", "username": "avalund"}, "location": {"city": "Oslo"}, "gender": "female"},
        {"name": {"first": "Bo", "last": "Ek"}, "login": {"uuid": "u-2", "username": "boek"}, "location": {"city": "Bergen"}, "gender": "male"},
        {"name": {"first": "Cai", "last": "Dahl"}, "login": {"uuid": "u-3", "username": "caidahl"}, "location": {"city": "Oslo"}, "gender": "female"},
        {"name": {"first": "Dag", "last": "Berg"}, "login": {"uuid": "u-4", "username": "dagberg"}, "location": {"city": "Tromsø"}, "gender": "male"},
        {"name": {"first": "Eli", "last": "Moe"}, "login": {"uuid": "u-5", "username": "elimoe"}, "location": {"city": "Oslo"}, "gender": "female"}
    ],
    "info": {"results": 5}
}"#;

const SECOND_BATCH: &str = r#"{
    "results": [
        {"name": {"first": "Bo", "last": "Ek"}, "login": {"uuid": "u-2", "username": "boek"}, "location": {"city": "Bergen"}, "gender": "male"},
        {"name": {"first": "Dag", "last": "Berg"}, "login": {"uuid": "u-4", "username": "dagberg"}, "location": {"city": "Tromsø"}, "gender": "male"}
    ]
}"#;

fn fixed_clock() -> i64 {
    1_700_000_000_000
}

fn new_state(page_size: usize) -> AppState {
    let config = Config {
        page_size,
        ..Config::default()
    };
    let mut state = initialize(&config);
    state.clock = fixed_clock;
    state
}

fn fetched_id(actions: &[Action]) -> RequestId {
    actions
        .iter()
        .find_map(|action| match action {
            Action::Fetch { request_id, .. } => Some(*request_id),
            _ => None,
        })
        .expect("a fetch action")
}

fn complete(state: &mut AppState, request_id: RequestId, status: u16, body: &str) -> bool {
    let event = Event::LoadCompleted {
        request_id,
        status,
        body: body.as_bytes().to_vec(),
    };
    handle_event(state, &event).unwrap().0
}

fn reload(state: &mut AppState) -> RequestId {
    let (_, actions) = handle_event(state, &Event::Reload).unwrap();
    fetched_id(&actions)
}

fn visible_names(state: &AppState) -> Vec<String> {
    state
        .visible
        .iter()
        .filter_map(|&index| state.collection.get(index))
        .map(|person| person.name.clone())
        .collect()
}

#[test]
fn startup_loads_preference_and_collection() {
    let mut state = new_state(2);

    let (render, actions) = handle_event(&mut state, &Event::PermissionsResult { granted: true }).unwrap();
    assert!(render);
    assert!(actions.contains(&Action::PostToWorker(WorkerMessage::load_preference("theme".to_string()))));
    assert!(actions.iter().any(|a| matches!(a, Action::ScheduleTimeout { seconds } if *seconds == 10.0)));

    let request_id = fetched_id(&actions);
    assert!(complete(&mut state, request_id, 200, FIRST_BATCH));

    assert_eq!(state.collection.len(), 5);
    assert_eq!(state.facets.values(Field::City), ["Oslo", "Bergen", "Tromsø"]);
    assert_eq!(state.facets.values(Field::Gender), ["female", "male"]);
    assert_eq!(state.revealed_count(), 2);

    let vm = state.compute_viewmodel(40, 100);
    assert!(vm.banner.is_none());
    assert_eq!(vm.cards.len(), 2);
    assert_eq!(vm.cards[0].name, "Ava Lund");
}

#[test]
fn search_and_facets_combine() {
    let mut state = new_state(0);
    let request_id = reload(&mut state);
    complete(&mut state, request_id, 200, FIRST_BATCH);

    let select_oslo = Event::FacetSelected {
        field: Field::City,
        value: Some("Oslo".to_string()),
    };
    handle_event(&mut state, &select_oslo).unwrap();
    assert_eq!(visible_names(&state), ["Ava Lund", "Cai Dahl", "Eli Moe"]);

    handle_event(&mut state, &Event::SearchChanged("  MOE ".to_string())).unwrap();
    assert_eq!(visible_names(&state), ["Eli Moe"]);
    assert_eq!(state.facets.values(Field::City).len(), 3);

    handle_event(&mut state, &Event::SearchChanged("berg".to_string())).unwrap();
    assert!(state.visible.is_empty());
    let vm = state.compute_viewmodel(40, 100);
    assert_eq!(vm.empty_state.map(|e| e.message), Some("No matches".to_string()));

    handle_event(&mut state, &Event::ClearFilters).unwrap();
    assert_eq!(state.visible.len(), 5);
}

#[test]
fn only_the_latest_request_is_applied() {
    let mut state = new_state(0);
    let stale = reload(&mut state);
    let latest = reload(&mut state);
    assert_ne!(stale, latest);

    assert!(!complete(&mut state, stale, 200, FIRST_BATCH));
    assert!(state.collection.is_empty());
    assert!(state.loader.is_loading());

    assert!(complete(&mut state, latest, 200, SECOND_BATCH));
    assert_eq!(state.collection.len(), 2);
    assert!(!state.loader.is_loading());

    assert!(!complete(&mut state, stale, 200, FIRST_BATCH));
    assert_eq!(state.collection.len(), 2);
}

#[test]
fn failed_reload_keeps_previous_collection() {
    let mut state = new_state(0);
    let request_id = reload(&mut state);
    complete(&mut state, request_id, 200, FIRST_BATCH);

    let request_id = reload(&mut state);
    complete(&mut state, request_id, 502, "bad gateway");

    assert_eq!(state.collection.len(), 5);
    assert_eq!(state.visible.len(), 5);
    assert!(state.last_error.is_some());
    let vm = state.compute_viewmodel(40, 100);
    assert_eq!(vm.banner.map(|b| b.kind), Some(BannerKind::Error));
    assert_eq!(vm.cards.len(), 5);

    let request_id = reload(&mut state);
    complete(&mut state, request_id, 200, "{\"people\": []}");
    assert_eq!(state.collection.len(), 5);
    assert!(state.last_error.is_some());

    let request_id = reload(&mut state);
    complete(&mut state, request_id, 200, FIRST_BATCH);
    assert!(state.last_error.is_none());
}

#[test]
fn reload_drops_vanished_selections_and_expansions() {
    let mut state = new_state(0);
    let request_id = reload(&mut state);
    complete(&mut state, request_id, 200, FIRST_BATCH);

    let select_female = Event::FacetSelected {
        field: Field::Gender,
        value: Some("female".to_string()),
    };
    handle_event(&mut state, &select_female).unwrap();
    handle_event(&mut state, &Event::ToggleExpanded(PersonId::new("u-1"))).unwrap();
    handle_event(&mut state, &Event::ToggleExpanded(PersonId::new("u-2"))).unwrap();
    assert_eq!(state.visible.len(), 3);

    let request_id = reload(&mut state);
    complete(&mut state, request_id, 200, SECOND_BATCH);

    assert_eq!(state.query.selection(Field::Gender), None);
    assert_eq!(visible_names(&state), ["Bo Ek", "Dag Berg"]);
    assert!(!state.view_state.is_expanded(&PersonId::new("u-1")));
    assert!(state.view_state.is_expanded(&PersonId::new("u-2")));
}

#[test]
fn load_more_reveals_pages_until_exhausted() {
    let mut state = new_state(2);
    let request_id = reload(&mut state);
    complete(&mut state, request_id, 200, FIRST_BATCH);

    assert_eq!(state.revealed_count(), 2);
    assert!(handle_event(&mut state, &Event::LoadMore).unwrap().0);
    assert_eq!(state.revealed_count(), 4);
    assert!(handle_event(&mut state, &Event::LoadMore).unwrap().0);
    assert_eq!(state.revealed_count(), 5);
    assert!(!handle_event(&mut state, &Event::LoadMore).unwrap().0);

    handle_event(&mut state, &Event::CycleFacet(Field::City)).unwrap();
    assert_eq!(state.query.selection(Field::City), Some("Oslo"));
    assert_eq!(state.revealed_count(), 2);
}
