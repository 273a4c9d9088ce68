//! Integration tests for the engine.
//!
//! These tests load a small dataset from disk, rank neighbors and explain
//! them, checking the ranking properties over every item in the catalog.

use data_loader::{Dataset, ITEMS_FILE, SIMILARITY_FILE};
use engine::{ExplanationGenerator, FALLBACK_EXPLANATION, Recommender};
use metadata::ItemMetadata;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

const ITEMS: &str = "\
19995::Avatar
285::Pirates of the Caribbean: At World's End
206647::Spectre
49026::The Dark Knight Rises
49529::John Carter
559::Spider-Man 3
";

const SIMILARITY: &str = "\
1.00 0.10 0.20 0.30 0.45 0.15
0.10 1.00 0.25 0.25 0.40 0.05
0.20 0.25 1.00 0.35 0.35 0.35
0.30 0.25 0.35 1.00 0.10 0.50
0.45 0.40 0.35 0.10 1.00 0.20
0.15 0.05 0.35 0.50 0.20 1.00
";

fn create_test_dataset(name: &str) -> Arc<Dataset> {
    let dir: PathBuf = std::env::temp_dir().join(format!(
        "whywatch-engine-{}-{}",
        name,
        std::process::id()
    ));
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join(ITEMS_FILE), ITEMS).unwrap();
    fs::write(dir.join(SIMILARITY_FILE), SIMILARITY).unwrap();

    let dataset = Dataset::load_from_files(&dir).unwrap();
    fs::remove_dir_all(&dir).ok();
    Arc::new(dataset)
}

#[test]
fn test_recommend_properties_for_every_item() {
    let dataset = create_test_dataset("properties");
    let recommender = Recommender::new(dataset.clone());
    let n = dataset.catalog.len();

    for item in dataset.catalog.iter() {
        for k in 1..n {
            let neighbors = recommender.recommend(&item.title, k).unwrap();

            assert_eq!(neighbors.len(), k, "exactly k results for '{}'", item.title);
            assert!(
                neighbors.iter().all(|nb| nb.row_index != item.row_index),
                "query item must not be recommended"
            );
            for pair in neighbors.windows(2) {
                assert!(pair[0].score >= pair[1].score, "scores must not increase");
                if pair[0].score == pair[1].score {
                    assert!(pair[0].row_index < pair[1].row_index, "ties by row order");
                }
            }
        }
    }
}

#[test]
fn test_recommend_is_deterministic() {
    let dataset = create_test_dataset("deterministic");
    let recommender = Recommender::new(dataset);

    let first = recommender.recommend("Spectre", 4).unwrap();
    for _ in 0..10 {
        assert_eq!(recommender.recommend("Spectre", 4).unwrap(), first);
    }

    // Three-way tie at 0.35 resolves in catalog order
    let titles: Vec<&str> = first.iter().map(|n| n.title.as_str()).collect();
    assert_eq!(
        titles,
        vec![
            "The Dark Knight Rises",
            "John Carter",
            "Spider-Man 3",
            "Pirates of the Caribbean: At World's End",
        ]
    );
}

#[test]
fn test_recommend_then_explain() {
    let dataset = create_test_dataset("explain");
    let recommender = Recommender::new(dataset);

    let neighbors = recommender.recommend("Avatar", 1).unwrap();
    assert_eq!(neighbors[0].title, "John Carter");
    assert_eq!(neighbors[0].item_id, 49529);

    let avatar = ItemMetadata::new(19995, "Avatar")
        .with_categories(["Action", "Adventure", "Fantasy", "Science Fiction"])
        .with_lead_contributor("James Cameron")
        .with_cast(["Sam Worthington", "Zoe Saldana"]);
    let john_carter = ItemMetadata::new(49529, "John Carter")
        .with_categories(["action", "adventure", "science fiction"])
        .with_lead_contributor("Andrew Stanton")
        .with_description("John Carter is a war-weary, former military captain who's inexplicably transported to the mysterious and exotic planet of Barsoom.");

    let explanation = ExplanationGenerator::new().explain(&avatar, &john_carter);
    assert!(explanation.starts_with(
        "Both movies share genres: Action, Adventure, Science Fiction. John Carter is"
    ));
    assert!(!explanation.contains(FALLBACK_EXPLANATION));
}
