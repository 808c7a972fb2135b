use graph_sdp::reader::Edge;
use graph_sdp::row::{RowAggregator, SparseRow};
use graph_sdp::*;
use rand::Rng;
use rand::seq::SliceRandom;

// A random graph whose edges are grouped by row, with shuffled columns
fn random_graph<R: Rng>(rng: &mut R, dim: usize) -> Vec<Edge> {
    let mut edges = Vec::new();
    for row in 1..=dim {
        let mut line: Vec<Edge> = (0..rng.random_range(0..6))
            .map(|_| Edge {
                row,
                col: rng.random_range(1..=dim),
                weight: rng.random_range(-3..=3) as f64,
            })
            .collect();
        line.shuffle(rng);
        edges.extend(line);
    }
    edges
}

fn to_text(dim: usize, edges: &[Edge]) -> String {
    let mut s = format!("{} {}\n", dim, edges.len());
    for e in edges {
        s.push_str(&format!("{} {} {}\n", e.row, e.col, e.weight));
    }
    s
}

fn aggregate(edges: &[Edge]) -> (Vec<SparseRow>, usize) {
    let mut agg = RowAggregator::new();
    let mut rows = Vec::new();
    let mut transitions = 0;
    for (k, &e) in edges.iter().enumerate() {
        if k > 0 && edges[k - 1].row != e.row {
            transitions += 1
        }
        if let Some(row) = agg.push(e, k + 2).unwrap() {
            rows.push(row.clone())
        }
    }
    if let Some(row) = agg.finish() {
        rows.push(row.clone())
    }
    (rows, transitions)
}

#[test]
pub fn one_dispatch_per_row_group() {
    let mut rng = rand::rng();
    for _ in 0..50 {
        let edges = random_graph(&mut rng, 8);
        let (rows, transitions) = aggregate(&edges);
        if edges.is_empty() {
            assert!(rows.is_empty())
        } else {
            assert_eq!(rows.len(), transitions + 1);
        }
        let total: usize = rows.iter().map(SparseRow::len).sum();
        assert_eq!(total, edges.len());
    }
}

#[test]
pub fn rows_are_sorted_stable_permutations() {
    let mut rng = rand::rng();
    for _ in 0..50 {
        let edges = random_graph(&mut rng, 8);
        let (rows, _) = aggregate(&edges);
        for row in rows {
            let input: Vec<(usize, f64)> = edges
                .iter()
                .filter(|e| e.row == row.row)
                .map(|e| (e.col, e.weight))
                .collect();
            assert!(row.entries.windows(2).all(|w| w[0].0 <= w[1].0));
            // Stability: for each column, the weights keep their input order
            for &(col, _) in &input {
                let before: Vec<f64> = input.iter().filter(|x| x.0 == col).map(|x| x.1).collect();
                let after: Vec<f64> = row.entries.iter().filter(|x| x.0 == col).map(|x| x.1).collect();
                assert_eq!(before, after);
            }
        }
    }
}

#[test]
pub fn outputs_do_not_depend_on_siblings() {
    let mut rng = rand::rng();
    let edges = random_graph(&mut rng, 10);
    let text = to_text(10, &edges);
    let mut all: Vec<(Format, Vec<u8>)> = Format::ALL.iter().map(|&f| (f, Vec::new())).collect();
    {
        let outputs = all.iter_mut().map(|(f, b)| (*f, b)).collect();
        let _ = convert(text.as_bytes(), outputs).unwrap();
    }
    for (format, together) in &all {
        let mut alone = Vec::new();
        let _ = convert(text.as_bytes(), vec![(*format, &mut alone)]).unwrap();
        assert_eq!(&alone, together, "{} differs", format);
    }
}

#[test]
pub fn objective_keeps_every_edge() {
    let mut rng = rand::rng();
    let edges = random_graph(&mut rng, 12);
    let text = to_text(12, &edges);
    let mut out = Vec::new();
    let _ = convert(text.as_bytes(), vec![(Format::MaxCut, &mut out)]).unwrap();
    let out = String::from_utf8(out).unwrap();
    let pobjm = out
        .lines()
        .skip_while(|l| *l != "POBJM")
        .skip(1)
        .take_while(|l| l.starts_with(' '))
        .count();
    assert_eq!(pobjm, edges.len());
}
