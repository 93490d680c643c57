//! File importance heuristics
//!
//! A score in `[0, 1]` saying how much later phases rely on a file. Shared
//! type definitions, API routes, schemas and providers rank high; tests and
//! stories rank low. Scores start at [`BASE_SCORE`] and each matching rule
//! adds its weight before the sum is clamped.

use once_cell::sync::Lazy;
use regex::Regex;

/// Score of a file no rule matches
pub const BASE_SCORE: f64 = 0.5;

static EXPORTED_TYPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"export\s+(?:declare\s+)?(?:interface|type)\s+\w+")
        .expect("valid exported type regex")
});

static CONTEXT_PROVIDER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"createContext\s*[<(]|\b\w+Provider\b").expect("valid provider regex")
});

static EXPORTED_HOOK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"export\s+(?:default\s+)?(?:async\s+)?(?:function|const)\s+use[A-Z]\w*")
        .expect("valid hook regex")
});

static SCHEMA_CONTENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?m)\b(?:pgTable|sqliteTable|mysqlTable|mongoose\.Schema|new Schema\s*\(|z\.object\s*\(|@Entity\b|defineTable\s*\()|^model\s+\w+\s*\{",
    )
    .expect("valid schema regex")
});

static TEST_FILE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:\.(?:test|spec|stories|story)\.\w+$)|(?:^|/)__tests__/")
        .expect("valid test file regex")
});

static CONFIG_FILE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?:^|/)(?:package\.json|tsconfig(?:\.\w+)?\.json|\.env(?:\.\w+)?|[\w-]+\.config\.(?:js|cjs|mjs|ts))$",
    )
    .expect("valid config file regex")
});

/// Check whether a path is a project configuration file
#[must_use]
pub fn is_config_path(path: &str) -> bool {
    CONFIG_FILE.is_match(path)
}

/// Check whether content exports an interface or type alias
#[must_use]
pub fn exports_types(content: &str) -> bool {
    EXPORTED_TYPE.is_match(content)
}

/// Check whether a path is a test, spec or story
#[must_use]
pub fn is_test_path(path: &str) -> bool {
    TEST_FILE.is_match(path)
}

fn in_dir(path: &str, dirs: &[&str]) -> bool {
    let rooted = format!("/{path}");
    dirs.iter().any(|dir| rooted.contains(&format!("/{dir}/")))
}

/// Importance of a file for later phases
#[must_use]
pub fn score(path: &str, content: &str) -> f64 {
    let lower_path = path.to_lowercase();
    let mut score = BASE_SCORE;

    if in_dir(&lower_path, &["types"]) || lower_path.ends_with(".d.ts") {
        score += 0.35;
    } else if exports_types(content) {
        score += 0.25;
    }

    if in_dir(&lower_path, &["api"]) {
        score += 0.25;
    }

    if in_dir(&lower_path, &["utils", "lib", "helpers"]) {
        score += 0.2;
    }

    if CONTEXT_PROVIDER.is_match(content) {
        score += 0.25;
    }

    if in_dir(&lower_path, &["hooks"]) || EXPORTED_HOOK.is_match(content) {
        score += 0.15;
    }

    if lower_path.contains("schema")
        || in_dir(&lower_path, &["models", "prisma", "db"])
        || SCHEMA_CONTENT.is_match(content)
    {
        score += 0.3;
    }

    if is_config_path(&lower_path) {
        score += 0.15;
    }

    if is_test_path(&lower_path) {
        score -= 0.3;
    }

    score.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn plain_component_scores_base() {
        assert_close(
            score("src/components/Card.tsx", "export default function Card() {}"),
            0.5,
        );
    }

    #[test]
    fn type_directory_outranks_exported_types() {
        assert_close(score("src/types/user.ts", "export interface User {}"), 0.85);
        assert_close(score("src/models.ts", "export type Id = string;"), 0.75);
        assert_close(score("env.d.ts", ""), 0.85);
    }

    #[test]
    fn api_and_utils_directories() {
        assert_close(
            score("src/app/api/users/route.ts", "export async function GET() {}"),
            0.75,
        );
        assert_close(
            score("src/lib/format.ts", "export const format = () => '';"),
            0.7,
        );
    }

    #[test]
    fn providers_and_hooks() {
        let provider =
            "const AuthContext = createContext(null);\nexport function AuthProvider() {}";
        assert_close(score("src/context/auth.tsx", provider), 0.75);
        assert_close(
            score("src/hooks/useCart.ts", "export function useCart() {}"),
            0.65,
        );
        assert_close(score("src/cart.ts", "export const useCart = () => {};"), 0.65);
    }

    #[test]
    fn schemas_and_config() {
        assert_close(
            score("prisma/schema.prisma", "model User {\n  id Int @id\n}"),
            0.8,
        );
        assert_close(
            score("src/db/tables.ts", "export const users = pgTable('users', {});"),
            0.8,
        );
        assert_close(score("next.config.js", "module.exports = {};"), 0.65);
        assert_close(score("package.json", "{}"), 0.65);
    }

    #[test]
    fn tests_and_stories_rank_low() {
        assert_close(score("src/components/Card.test.tsx", ""), 0.2);
        assert_close(score("src/components/Card.stories.tsx", ""), 0.2);
        assert_close(score("src/__tests__/card.tsx", ""), 0.2);
    }

    #[test]
    fn clamped_to_unit_interval() {
        let everything =
            "createContext(null)\nexport function useThing() {}\nexport const t = pgTable('t', {});";
        assert_close(score("src/types/api/lib/hooks/schema.ts", everything), 1.0);
    }
}
