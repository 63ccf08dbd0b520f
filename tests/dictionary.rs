//! End-to-end dictionary behavior across all three index strategies.

use polygon_dict::{
    DictConfig, DictError, DictionaryBuilder, GridConfig, IndexStrategy, MemoryProvider, Point,
    PolygonDictionary, PolygonRow, RawGeometry,
};

const ALL_STRATEGIES: [IndexStrategy; 3] = [
    IndexStrategy::Exhaustive,
    IndexStrategy::GridBucket,
    IndexStrategy::GridMergedLeaf,
];

fn ring_row(id: u64, ring: &[(f64, f64)]) -> PolygonRow {
    PolygonRow::new(id, RawGeometry::RingPoints(vec![ring.to_vec()]))
}

fn square_row(id: u64, lo_x: f64, lo_y: f64, size: f64) -> PolygonRow {
    ring_row(
        id,
        &[
            (lo_x, lo_y),
            (lo_x + size, lo_y),
            (lo_x + size, lo_y + size),
            (lo_x, lo_y + size),
        ],
    )
}

fn build(strategy: IndexStrategy, rows: Vec<PolygonRow>) -> PolygonDictionary {
    DictionaryBuilder::new(DictConfig::new(strategy))
        .build(&MemoryProvider::new(rows))
        .unwrap()
}

fn nested_squares() -> Vec<PolygonRow> {
    vec![
        ring_row(0, &[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)]),
        ring_row(1, &[(2.0, 2.0), (4.0, 2.0), (4.0, 4.0), (2.0, 4.0)]),
    ]
}

#[test]
fn nested_squares_scenario() {
    for strategy in ALL_STRATEGIES {
        let dict = build(strategy, nested_squares());
        // Inside both: the smaller polygon wins.
        assert_eq!(dict.find(Point::new(3.0, 3.0)), Some(1), "{strategy:?}");
        // Inside only the outer square.
        assert_eq!(dict.find(Point::new(8.0, 8.0)), Some(0), "{strategy:?}");
        // Outside everything.
        assert_eq!(dict.find(Point::new(20.0, 20.0)), None, "{strategy:?}");
        // On the outer boundary: boundary points are contained.
        assert_eq!(dict.find(Point::new(0.0, 0.0)), Some(0), "{strategy:?}");
    }
}

#[test]
fn strategies_agree_on_unique_containment() {
    let mut rows = Vec::new();
    for gy in 0..5 {
        for gx in 0..5 {
            rows.push(square_row(
                (gy * 5 + gx) as u64,
                gx as f64 * 10.0,
                gy as f64 * 10.0,
                8.0,
            ));
        }
    }

    let dicts: Vec<_> = ALL_STRATEGIES
        .iter()
        .map(|&s| build(s, rows.clone()))
        .collect();

    for gy in 0..5 {
        for gx in 0..5 {
            let p = Point::new(gx as f64 * 10.0 + 4.0, gy as f64 * 10.0 + 4.0);
            let expected = Some((gy * 5 + gx) as u64);
            for dict in &dicts {
                assert_eq!(dict.find(p), expected, "{:?}", dict.config().strategy);
            }
        }
        // Gap between columns: no polygon contains it.
        let gap = Point::new(9.0, gy as f64 * 10.0 + 4.0);
        for dict in &dicts {
            assert_eq!(dict.find(gap), None);
        }
    }
}

#[test]
fn outside_union_bbox_is_none() {
    for strategy in ALL_STRATEGIES {
        let dict = build(strategy, nested_squares());
        for p in [
            Point::new(-1.0, 5.0),
            Point::new(11.0, 5.0),
            Point::new(5.0, -1.0),
            Point::new(5.0, 11.0),
            Point::new(1e9, 1e9),
        ] {
            assert_eq!(dict.find(p), None, "{strategy:?} {p:?}");
        }
    }
}

#[test]
fn strictly_smaller_area_wins() {
    // Three nested polygons with strictly ordered areas.
    let rows = vec![
        square_row(10, 0.0, 0.0, 100.0),
        square_row(11, 10.0, 10.0, 50.0),
        square_row(12, 20.0, 20.0, 10.0),
    ];
    for strategy in ALL_STRATEGIES {
        let dict = build(strategy, rows.clone());
        assert_eq!(dict.find(Point::new(25.0, 25.0)), Some(12), "{strategy:?}");
        assert_eq!(dict.find(Point::new(15.0, 15.0)), Some(11), "{strategy:?}");
        assert_eq!(dict.find(Point::new(5.0, 5.0)), Some(10), "{strategy:?}");
    }
}

#[test]
fn tunables_do_not_change_answers() {
    let rows: Vec<PolygonRow> = (0..16)
        .map(|i| square_row(i, (i % 4) as f64 * 7.0, (i / 4) as f64 * 7.0, 5.0))
        .collect();
    let probes: Vec<Point> = (0..16)
        .map(|i| Point::new((i % 4) as f64 * 7.0 + 2.0, (i / 4) as f64 * 7.0 + 2.0))
        .chain([Point::new(6.0, 6.0), Point::new(-3.0, 4.0)])
        .collect();

    let baseline = build(IndexStrategy::Exhaustive, rows.clone());
    for strategy in [IndexStrategy::GridBucket, IndexStrategy::GridMergedLeaf] {
        for min_intersections in [0, 1, 4, 100] {
            for max_depth in [0, 1, 5, 7] {
                let config = DictConfig::new(strategy).with_grid(GridConfig {
                    min_intersections,
                    max_depth,
                });
                let dict = DictionaryBuilder::new(config)
                    .build(&MemoryProvider::new(rows.clone()))
                    .unwrap();
                for &p in &probes {
                    assert_eq!(
                        dict.find(p),
                        baseline.find(p),
                        "{strategy:?} min={min_intersections} depth={max_depth} {p:?}"
                    );
                }
            }
        }
    }
}

#[test]
fn boundary_vertex_next_to_another_polygon() {
    // The triangle's right-most vertex lands on an interior slab boundary
    // of any merged index because the square contributes vertex x's further
    // right. Boundary points stay contained for every strategy and every
    // grid configuration.
    let rows = vec![
        ring_row(0, &[(0.0, 0.0), (5.0, 5.0), (0.0, 10.0)]),
        square_row(1, 6.0, 0.0, 4.0),
    ];
    let vertex = Point::new(5.0, 5.0);
    for strategy in ALL_STRATEGIES {
        let dict = build(strategy, rows.clone());
        assert_eq!(dict.find(vertex), Some(0), "{strategy:?}");
    }
    // max_depth = 0 merges both polygons into a single leaf index.
    for strategy in [IndexStrategy::GridBucket, IndexStrategy::GridMergedLeaf] {
        let config = DictConfig::new(strategy).with_grid(GridConfig {
            min_intersections: 1,
            max_depth: 0,
        });
        let dict = DictionaryBuilder::new(config)
            .build(&MemoryProvider::new(rows.clone()))
            .unwrap();
        assert_eq!(dict.find(vertex), Some(0), "{strategy:?} depth=0");
    }
}

#[test]
fn polygon_with_hole_end_to_end() {
    let donut = PolygonRow::new(
        0,
        RawGeometry::RingPoints(vec![
            vec![(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)],
            vec![(4.0, 4.0), (6.0, 4.0), (6.0, 6.0), (4.0, 6.0)],
        ]),
    );
    for strategy in ALL_STRATEGIES {
        let dict = build(strategy, vec![donut.clone()]);
        assert_eq!(dict.find(Point::new(5.0, 5.0)), None, "{strategy:?}");
        assert_eq!(dict.find(Point::new(2.0, 2.0)), Some(0), "{strategy:?}");
        assert_eq!(dict.find(Point::new(4.0, 5.0)), Some(0), "{strategy:?}");
    }
}

#[test]
fn degenerate_ring_fails_build() {
    let rows = vec![
        square_row(0, 0.0, 0.0, 10.0),
        ring_row(1, &[(0.0, 0.0), (5.0, 5.0), (9.0, 9.0)]),
    ];
    for strategy in ALL_STRATEGIES {
        let err = DictionaryBuilder::new(DictConfig::new(strategy))
            .build(&MemoryProvider::new(rows.clone()))
            .unwrap_err();
        assert!(matches!(err, DictError::DegenerateRing { polygon_id: 1 }));
    }
}

#[test]
fn short_ring_fails_build() {
    let rows = vec![ring_row(0, &[(0.0, 0.0), (1.0, 0.0)])];
    let err = DictionaryBuilder::new(DictConfig::default())
        .build(&MemoryProvider::new(rows))
        .unwrap_err();
    assert!(matches!(
        err,
        DictError::RingTooSmall { polygon_id: 0, vertices: 2 }
    ));
}

#[test]
fn rebuild_answers_identically() {
    let rows = nested_squares();
    let probes = [
        Point::new(3.0, 3.0),
        Point::new(8.0, 8.0),
        Point::new(20.0, 20.0),
        Point::new(0.0, 0.0),
        Point::new(2.0, 2.0),
        Point::new(4.0, 4.0),
    ];
    for strategy in ALL_STRATEGIES {
        let dict = build(strategy, rows.clone());
        let copy = dict.rebuild();
        assert_eq!(copy.len(), dict.len());
        for p in probes {
            assert_eq!(copy.find(p), dict.find(p), "{strategy:?} {p:?}");
        }
        // The original stays fully usable alongside the copy.
        drop(copy);
        assert_eq!(dict.find(Point::new(3.0, 3.0)), Some(1));
    }
}

#[test]
fn concurrent_queries_need_no_locking() {
    let dict = std::sync::Arc::new(build(IndexStrategy::GridBucket, nested_squares()));
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let dict = std::sync::Arc::clone(&dict);
            std::thread::spawn(move || {
                for _ in 0..1000 {
                    assert_eq!(dict.find(Point::new(3.0, 3.0)), Some(1));
                    assert_eq!(dict.find(Point::new(20.0, 20.0)), None);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
}

#[test]
fn overlapping_polygons_prefer_smaller_across_leaves() {
    // A large polygon spanning many grid cells plus small ones inside it.
    let mut rows = vec![square_row(100, 0.0, 0.0, 40.0)];
    for i in 0..4 {
        rows.push(square_row(i, i as f64 * 10.0 + 2.0, 2.0, 4.0));
    }
    for strategy in ALL_STRATEGIES {
        let dict = build(strategy, rows.clone());
        for i in 0..4u64 {
            let p = Point::new(i as f64 * 10.0 + 4.0, 4.0);
            assert_eq!(dict.find(p), Some(i), "{strategy:?}");
        }
        assert_eq!(dict.find(Point::new(20.0, 30.0)), Some(100), "{strategy:?}");
    }
}
