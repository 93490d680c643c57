use ppe_context::{
    importance, ContextConfig, ContextWindowBuilder, GeneratedFile, Inclusion, ScoredFile,
};
use proptest::prelude::*;

const PATHS: &[&str] = &[
    "src/types/user.ts",
    "src/app/api/items/route.ts",
    "src/components/Card.tsx",
    "src/lib/format.ts",
    "src/hooks/useCart.ts",
    "src/components/Card.test.tsx",
    "prisma/schema.prisma",
    "README.md",
];

fn files() -> impl Strategy<Value = Vec<GeneratedFile>> {
    proptest::collection::vec((0..PATHS.len(), "[a-z \n]{0,600}"), 0..10).prop_map(|picks| {
        picks
            .into_iter()
            .map(|(index, content)| GeneratedFile::new(PATHS[index], content))
            .collect()
    })
}

fn select(files: &[GeneratedFile], config: ContextConfig) -> ppe_context::ContextWindow {
    let scored = files
        .iter()
        .map(|file| ScoredFile {
            file,
            score: importance::score(&file.path, &file.content),
        })
        .collect();
    ContextWindowBuilder::new(config).select(scored)
}

proptest! {
    #[test]
    fn prop_context_never_exceeds_ceiling(
        files in files(),
        max_chars in 200usize..3000,
        floor in 0usize..800,
    ) {
        let config = ContextConfig::default()
            .with_max_chars(max_chars)
            .with_truncation_floor(floor);
        let window = select(&files, config);
        prop_assert!(window.text.len() <= max_chars);
        prop_assert_eq!(window.files.len(), files.len());
    }

    #[test]
    fn prop_top_high_importance_file_is_represented(
        files in files(),
        max_chars in 200usize..3000,
    ) {
        let window = select(&files, ContextConfig::default().with_max_chars(max_chars));
        if let Some(top) = window.files.first() {
            if top.score >= 0.8 {
                prop_assert_ne!(top.inclusion, Inclusion::Omitted);
                let header = format!("// File: {}\n", top.path);
                prop_assert!(window.text.starts_with(&header));
            }
        }
    }

    #[test]
    fn prop_selection_is_score_ordered(files in files(), max_chars in 200usize..3000) {
        let window = select(&files, ContextConfig::default().with_max_chars(max_chars));
        for pair in window.files.windows(2) {
            prop_assert!(pair[0].score >= pair[1].score);
        }
    }

    #[test]
    fn prop_full_files_appear_verbatim(files in files(), max_chars in 200usize..3000) {
        let window = select(&files, ContextConfig::default().with_max_chars(max_chars));
        for selected in window.files.iter().filter(|f| f.inclusion == Inclusion::Full) {
            let header = format!("// File: {}\n", selected.path);
            prop_assert!(window.text.contains(&header));
        }
    }
}
