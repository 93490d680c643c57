//! Coding pattern fingerprints
//!
//! Records which libraries and idioms generated code already uses so later
//! phases can be told to stay consistent with them.

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

/// Category, technique name, content needles (any one suffices)
type Rule = (Category, &'static str, &'static [&'static str]);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Category {
    State,
    DataFetching,
    Styling,
    Forms,
    Auth,
    ErrorHandling,
}

const RULES: &[Rule] = &[
    (Category::State, "zustand", &["from 'zustand'", "from \"zustand\""]),
    (Category::State, "redux", &["@reduxjs/toolkit", "from 'react-redux'", "from \"react-redux\""]),
    (Category::State, "react context", &["createContext(", "createContext<", "useContext("]),
    (Category::State, "local component state", &["useState(", "useState<", "useReducer("]),
    (Category::DataFetching, "react-query", &["@tanstack/react-query", "useQuery("]),
    (Category::DataFetching, "swr", &["from 'swr'", "from \"swr\"", "useSWR("]),
    (Category::DataFetching, "axios", &["from 'axios'", "from \"axios\"", "axios."]),
    (Category::DataFetching, "fetch", &["fetch("]),
    (Category::Styling, "tailwind", &["className=\"", "className={`", "@tailwind"]),
    (Category::Styling, "css modules", &[".module.css", ".module.scss"]),
    (Category::Styling, "styled-components", &["styled-components", "@emotion/styled"]),
    (Category::Forms, "react-hook-form", &["react-hook-form", "useForm("]),
    (Category::Forms, "formik", &["from 'formik'", "from \"formik\"", "<Formik"]),
    (Category::Forms, "zod validation", &["from 'zod'", "from \"zod\"", "z.object("]),
    (Category::Auth, "next-auth", &["next-auth"]),
    (Category::Auth, "clerk", &["@clerk/"]),
    (Category::Auth, "supabase auth", &["supabase.auth"]),
    (Category::Auth, "jwt", &["jsonwebtoken", "jwt.sign(", "jwt.verify("]),
    (Category::ErrorHandling, "try/catch", &["try {", "catch ("]),
    (Category::ErrorHandling, "error boundaries", &["ErrorBoundary", "componentDidCatch"]),
    (Category::ErrorHandling, "toast notifications", &["toast.error(", "toast("]),
];

/// Techniques seen per category, in first-seen order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodingPatterns {
    pub state_management: IndexSet<String>,
    pub data_fetching: IndexSet<String>,
    pub styling: IndexSet<String>,
    pub forms: IndexSet<String>,
    pub auth: IndexSet<String>,
    pub error_handling: IndexSet<String>,
}

impl CodingPatterns {
    /// Fingerprint one file
    #[must_use]
    pub fn detect(content: &str) -> Self {
        let mut patterns = Self::default();
        for (category, name, needles) in RULES {
            if needles.iter().any(|needle| content.contains(needle)) {
                patterns.slot(*category).insert((*name).to_string());
            }
        }
        patterns
    }

    /// Fold another fingerprint into this one
    pub fn merge(&mut self, other: &CodingPatterns) {
        self.state_management.extend(other.state_management.iter().cloned());
        self.data_fetching.extend(other.data_fetching.iter().cloned());
        self.styling.extend(other.styling.iter().cloned());
        self.forms.extend(other.forms.iter().cloned());
        self.auth.extend(other.auth.iter().cloned());
        self.error_handling.extend(other.error_handling.iter().cloned());
    }

    /// Check if nothing was detected
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.state_management.is_empty()
            && self.data_fetching.is_empty()
            && self.styling.is_empty()
            && self.forms.is_empty()
            && self.auth.is_empty()
            && self.error_handling.is_empty()
    }

    /// One instruction per non-empty category
    #[must_use]
    pub fn guidelines(&self) -> Vec<String> {
        [
            ("Manage state with", &self.state_management),
            ("Fetch data with", &self.data_fetching),
            ("Style components with", &self.styling),
            ("Build forms with", &self.forms),
            ("Handle authentication with", &self.auth),
            ("Handle errors with", &self.error_handling),
        ]
        .into_iter()
        .filter(|(_, seen)| !seen.is_empty())
        .map(|(lead, seen)| {
            let list: Vec<&str> = seen.iter().map(String::as_str).collect();
            format!("{lead} {}", list.join(", "))
        })
        .collect()
    }

    fn slot(&mut self, category: Category) -> &mut IndexSet<String> {
        match category {
            Category::State => &mut self.state_management,
            Category::DataFetching => &mut self.data_fetching,
            Category::Styling => &mut self.styling,
            Category::Forms => &mut self.forms,
            Category::Auth => &mut self.auth,
            Category::ErrorHandling => &mut self.error_handling,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn detects_component_idioms() {
        let patterns = CodingPatterns::detect(
            "import { useState } from 'react';\nconst [a, setA] = useState(0);\nreturn <div className=\"p-4\" />;",
        );
        assert!(patterns.state_management.contains("local component state"));
        assert!(patterns.styling.contains("tailwind"));
        assert!(patterns.auth.is_empty());
    }

    #[test]
    fn merge_keeps_first_seen_order() {
        let mut all = CodingPatterns::detect("import axios from 'axios';");
        all.merge(&CodingPatterns::detect("await fetch('/api');\nimport axios from 'axios';"));
        let fetching: Vec<_> = all.data_fetching.iter().map(String::as_str).collect();
        assert_eq!(fetching, vec!["axios", "fetch"]);
    }

    #[test]
    fn guidelines_cover_detected_categories() {
        let patterns =
            CodingPatterns::detect("import NextAuth from 'next-auth';\ntry { x() } catch (e) {}");
        assert_eq!(
            patterns.guidelines(),
            vec![
                "Handle authentication with next-auth",
                "Handle errors with try/catch",
            ]
        );
        assert!(CodingPatterns::default().guidelines().is_empty());
        assert!(CodingPatterns::default().is_empty());
    }
}
