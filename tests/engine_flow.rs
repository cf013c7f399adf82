use tastegraph::build::{AlbumRecord, ArtistRecord, GraphBuilder, TrackRecord};
use tastegraph::{Engine, EngineConfig, LayoutMode, NodeKind, ViewFilter};

fn sample_graph() -> tastegraph::Graph {
    GraphBuilder::new()
        .with_artists(vec![
            ArtistRecord {
                id: "a1".into(),
                name: "First Artist".into(),
                genres: vec!["rock".into(), "indie".into()],
                popularity: Some(70),
            },
            ArtistRecord {
                id: "a2".into(),
                name: "Second Artist".into(),
                genres: vec!["rock".into()],
                popularity: Some(40),
            },
        ])
        .with_albums(vec![AlbumRecord {
            id: "al1".into(),
            name: "Debut".into(),
            artist_id: "a1".into(),
            popularity: Some(55),
        }])
        .with_tracks(vec![
            TrackRecord {
                id: "t1".into(),
                name: "Opener".into(),
                artist_id: "a1".into(),
                album_id: Some("al1".into()),
                popularity: Some(60),
            },
            TrackRecord {
                id: "t2".into(),
                name: "Single".into(),
                artist_id: "a2".into(),
                album_id: None,
                popularity: None,
            },
        ])
        .build()
        .unwrap()
}

#[test]
fn layout_settles_and_snapshots_stay_finite() {
    let g = sample_graph();
    let cfg = EngineConfig::tuned_for(g.node_count());
    let mut engine = Engine::new(g, cfg);

    let mut ticks = 0;
    loop {
        let frame = engine.tick().expect("engine is running");
        for node in &frame.nodes {
            assert!(node.x.is_finite() && node.y.is_finite());
            assert!(node.radius > 0.);
            assert_ne!(node.kind, NodeKind::Helper);
        }
        if frame.settled {
            break;
        }
        ticks += 1;
        assert!(ticks < 10_000, "layout must settle in bounded time");
    }
}

#[test]
fn hover_highlights_lineage_through_the_hierarchy() {
    let mut engine = Engine::new(sample_graph(), EngineConfig::default());

    engine.hover_enter("al1");
    let highlighted = engine.highlighted_node_ids();
    // Upstream: owning artist and its genres. Downstream: the album's track.
    for id in ["al1", "a1", "rock", "indie", "t1"] {
        assert!(highlighted.contains(&id.to_string()), "missing {id}");
    }
    // The other artist's lineage stays out.
    assert!(!highlighted.contains(&"a2".to_string()));
    assert!(!highlighted.contains(&"t2".to_string()));

    let frame = engine.tick().unwrap();
    let t2 = frame.nodes.iter().find(|n| n.id == "t2").unwrap();
    assert!(t2.dimmed && !t2.highlighted);
}

#[test]
fn drag_filter_and_mode_round_trip() {
    let mut engine = Engine::new(sample_graph(), EngineConfig::default());

    engine.drag_start("a1");
    engine.drag_move("a1", egui::Pos2::new(10., 10.));
    engine.tick();
    assert_eq!(
        engine.graph().node_by_id("a1").unwrap().location(),
        egui::Pos2::new(10., 10.)
    );
    engine.drag_end("a1");
    assert!(!engine.graph().node_by_id("a1").unwrap().is_pinned());

    engine.set_filter(ViewFilter::default().with_tracks(false));
    let frame = engine.tick().unwrap();
    assert!(frame.nodes.iter().all(|n| n.kind != NodeKind::Track));
    assert!(frame.nodes.iter().any(|n| n.kind == NodeKind::Artist));

    engine.set_mode(LayoutMode::Hierarchical);
    assert_eq!(engine.mode(), LayoutMode::Hierarchical);
    assert!(!engine.is_settled());
}

#[test]
fn stopping_the_engine_ends_the_tick_stream() {
    let mut engine = Engine::new(sample_graph(), EngineConfig::default());
    assert!(engine.tick().is_some());
    engine.stop();
    assert!(engine.tick().is_none());
    assert!(engine.tick().is_none());
}

#[cfg(feature = "events")]
mod events {
    use super::*;
    use tastegraph::events::Event;

    #[test]
    fn interactions_publish_to_a_channel_sink() {
        let (tx, rx) = crossbeam::channel::unbounded();
        let mut engine =
            Engine::new(sample_graph(), EngineConfig::default()).with_event_sink(tx);

        engine.drag_start("a1");
        engine.drag_end("a1");
        engine.set_filter(ViewFilter::default().with_albums(false));
        engine.set_mode(LayoutMode::Hierarchical);

        let events: Vec<Event> = rx.try_iter().collect();
        assert!(matches!(events[0], Event::NodeDragStart(_)));
        assert!(matches!(events[1], Event::NodeDragEnd(_)));
        assert!(matches!(events[2], Event::FilterApplied(_)));
        assert!(matches!(events[3], Event::ModeChanged(_)));
    }

    #[test]
    fn settling_is_announced_once() {
        let (tx, rx) = crossbeam::channel::unbounded();
        let mut engine =
            Engine::new(sample_graph(), EngineConfig::default()).with_event_sink(tx);

        for _ in 0..10_000 {
            engine.tick();
            if engine.is_settled() {
                break;
            }
        }
        engine.tick();
        engine.tick();

        let settled: Vec<Event> = rx
            .try_iter()
            .filter(|e| matches!(e, Event::Settled(_)))
            .collect();
        assert_eq!(settled.len(), 1);
    }
}
