//! Testing utilities for the PPE workspace
//!
//! Shared concept fixtures, classification builders and generated-output
//! samples.

#![allow(missing_docs)]

use ppe_core::{
    AppConcept, Complexity, DataField, DataModel, Domain, Feature, FeatureClassification,
    LayoutDesign, LayoutManifest, Priority, Role, TechnicalRequirements,
};

pub fn feature(id: &str, name: &str, description: &str, priority: Priority) -> Feature {
    Feature::new(id, name, description, priority)
}

pub fn classification(name: &str, domain: Domain, tokens: u32) -> FeatureClassification {
    FeatureClassification {
        name: name.to_string(),
        description: String::new(),
        priority: Priority::Medium,
        domain,
        complexity: Complexity::Simple,
        token_estimate: tokens,
        requires_own_phase: false,
        suggested_phase_name: name.to_string(),
        dependency_names: Vec::new(),
        keywords: Vec::new(),
    }
}

/// Single login feature plus a database
pub fn login_concept() -> AppConcept {
    AppConcept::new("Recipe Box", "Personal recipe collection")
        .with_feature(feature("f1", "User Login", "login with password", Priority::High))
        .with_technical(TechnicalRequirements {
            needs_database: true,
            ..TechnicalRequirements::default()
        })
}

/// No features and every technical flag off
pub fn empty_concept() -> AppConcept {
    AppConcept::new("Blank", "Nothing requested yet")
}

/// Concept touching most domains
pub fn marketplace_concept() -> AppConcept {
    AppConcept {
        purpose: "Let makers sell handmade goods".into(),
        target_users: "Independent makers and their buyers".into(),
        ..AppConcept::new("Maker Market", "Marketplace for handmade goods")
    }
    .with_feature(feature("f1", "Sign up", "register and log in with email", Priority::High))
    .with_feature(feature(
        "f2",
        "Product listings",
        "create, edit and manage product listings",
        Priority::High,
    ))
    .with_feature(feature("f3", "Product photos", "upload photos for each product", Priority::High))
    .with_feature(feature("f4", "Checkout", "pay with stripe", Priority::High))
    .with_feature(feature(
        "f5",
        "Seller chat",
        "chat between buyer and seller in real time",
        Priority::Medium,
    ))
    .with_feature(feature(
        "f6",
        "Order history",
        "see past orders saved for the user",
        Priority::Medium,
    ))
    .with_feature(feature(
        "f7",
        "Catalog search",
        "search and filter products by category",
        Priority::Medium,
    ))
    .with_feature(feature(
        "f8",
        "Sales reports",
        "analytics and reports for sellers",
        Priority::Low,
    ))
    .with_feature(feature("f9", "Moderation", "admin panel to moderate listings", Priority::Low))
    .with_feature(feature("f10", "Wishlist", "keep favourite products", Priority::Low))
    .with_feature(feature("f11", "Gift notes", "add a note to an order", Priority::Low))
    .with_technical(TechnicalRequirements {
        needs_auth: true,
        needs_database: true,
        needs_file_upload: true,
        needs_realtime: true,
        ..TechnicalRequirements::default()
    })
    .with_roles(vec![
        Role {
            name: "seller".into(),
            capabilities: vec!["list products".into(), "view reports".into()],
        },
        Role {
            name: "admin".into(),
            capabilities: vec!["moderate listings".into()],
        },
    ])
    .with_data_models(vec![DataModel {
        name: "Product".into(),
        fields: vec![
            DataField {
                name: "title".into(),
                field_type: "string".into(),
                required: true,
            },
            DataField {
                name: "price".into(),
                field_type: "number".into(),
                required: true,
            },
        ],
    }])
    .with_layout_design(LayoutDesign {
        name: Some("Warm craft".into()),
        notes: Some("Earthy palette, rounded cards".into()),
        global_styles: None,
    })
    .with_layout_manifest(LayoutManifest {
        detected_features: vec!["SearchBar".into(), "ThemeToggle".into()],
    })
    .with_conversation(
        "Sellers need to log in before they can list anything.\n\n\
         Every product should have at least one photo upload.\n\n\
         Buyers want to search by category and filter by price.",
    )
}

/// Generated output in the delimited grammar
pub const GENERATED_OUTPUT: &str = "\
===FILE:src/types/recipe.ts===
/** Recipe domain types */
export interface Recipe {
  id: string;
  title: string;
}

export type RecipeId = string;
===FILE:src/app/api/recipes/route.ts===
import { NextResponse } from 'next/server';
import { getServerSession } from 'next-auth';
import { db } from '../../../lib/db';

export async function GET() {
  const session = await getServerSession();
  if (!session) {
    return NextResponse.json({ error: 'Unauthorized' }, { status: 401 });
  }
  return NextResponse.json(await db.recipe.findMany());
}

export async function POST(request: Request) {
  const body = await request.json();
  return NextResponse.json(await db.recipe.create({ data: body }));
}
===FILE:src/components/RecipeCard.tsx===
import React, { useState } from 'react';
import type { Recipe } from '../types/recipe';

export default function RecipeCard({ recipe }: { recipe: Recipe }) {
  const [open, setOpen] = useState(false);
  return <div className=\"rounded-lg p-4\" onClick={() => setOpen(!open)}>{recipe.title}</div>;
}
===FILE:src/components/RecipeCard.test.tsx===
import { render } from '@testing-library/react';
import RecipeCard from './RecipeCard';

test('renders', () => {
  render(<RecipeCard recipe={{ id: '1', title: 'Soup' }} />);
});
===DEPENDENCIES===
{\"next\": \"14.0.0\", \"next-auth\": \"^4.24.0\"}
===END===
";

/// Render files into the delimited grammar
pub fn delimited(files: &[(&str, &str)]) -> String {
    let mut out = String::new();
    for (path, content) in files {
        out.push_str("===FILE:");
        out.push_str(path);
        out.push_str("===\n");
        out.push_str(content);
        out.push('\n');
    }
    out.push_str("===END===\n");
    out
}
