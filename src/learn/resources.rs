//! Curated learning material keyed by technology and concept.

use std::collections::HashSet;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::techdetect::detect_technologies;

/// A link shown in the learn panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LearningItem {
    /// `docs`, `video` or `course`.
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
    #[serde(rename = "publishedAt", skip_serializing_if = "Option::is_none")]
    pub published_at: Option<String>,
}

impl LearningItem {
    pub fn new(kind: &str, title: &str, url: &str) -> Self {
        Self {
            kind: kind.to_string(),
            title: title.to_string(),
            url: url.to_string(),
            channel: None,
            published_at: None,
        }
    }
}

/// Resources of one technology, as returned by `/api/learn/resources`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TechnologyResources {
    pub technology: String,
    pub items: Vec<LearningItem>,
}

type Catalog = &'static [(&'static str, &'static [(&'static str, &'static str, &'static str)])];

/// `(technology, [(type, title, url)])` for `/api/learn/resources`.
const RESOURCES: Catalog = &[
    (
        "React",
        &[
            ("docs", "React Official Docs (Beta)", "https://react.dev/learn"),
            ("video", "React Hooks Course – freeCodeCamp", "https://youtu.be/TNhaISOUy6Q"),
            ("course", "Epic React by Kent C. Dodds (free articles)", "https://epicreact.dev/articles"),
        ],
    ),
    (
        "Next.js",
        &[
            ("course", "Next.js Learn", "https://nextjs.org/learn"),
            ("video", "Next.js App Router Crash Course", "https://youtu.be/Hiabp1GY8fA"),
            ("docs", "Next.js Docs", "https://nextjs.org/docs"),
        ],
    ),
    (
        "Node.js",
        &[
            ("docs", "Node.js Docs", "https://nodejs.org/en/learn"),
            ("video", "Node.js Crash Course – Traversy Media", "https://youtu.be/fBNz5xF-Kx4"),
            (
                "course",
                "The Odin Project: NodeJS",
                "https://www.theodinproject.com/paths/full-stack-javascript/courses/nodejs",
            ),
        ],
    ),
    (
        "TypeScript",
        &[
            ("docs", "TypeScript Handbook", "https://www.typescriptlang.org/docs/handbook/intro.html"),
            ("video", "TypeScript for Beginners – freeCodeCamp", "https://youtu.be/30LWjhZzg50"),
            ("course", "Total TypeScript (free fundamentals)", "https://www.totaltypescript.com/tutorials"),
        ],
    ),
    (
        "TailwindCSS",
        &[
            ("docs", "TailwindCSS Docs", "https://tailwindcss.com/docs/utility-first"),
            ("video", "Tailwind From Scratch – Traversy Media", "https://youtu.be/dFgzHOX84xQ"),
            (
                "video",
                "Tailwind CSS Course – Net Ninja",
                "https://youtube.com/playlist?list=PL4cUxeGkcC9itC4TxYMzFCfS08S0CFgls",
            ),
        ],
    ),
];

/// Contextual catalog; covers a few more technologies than [`RESOURCES`].
const CONTEXTUAL: Catalog = &[
    (
        "React",
        &[
            ("docs", "React Official Docs (Learn)", "https://react.dev/learn"),
            ("video", "React Hooks Course – freeCodeCamp", "https://www.youtube.com/watch?v=TNhaISOUy6Q"),
            ("video", "React 18 Crash Course – Traversy Media", "https://www.youtube.com/watch?v=LDB4uaJ87e0"),
        ],
    ),
    (
        "Next.js",
        &[
            ("course", "Next.js Learn (Official)", "https://nextjs.org/learn"),
            (
                "video",
                "Next.js 13 App Router Crash Course – Traversy",
                "https://www.youtube.com/watch?v=Hiabp1GY8fA",
            ),
            ("docs", "Next.js Docs", "https://nextjs.org/docs"),
        ],
    ),
    (
        "TypeScript",
        &[
            ("docs", "TypeScript Handbook", "https://www.typescriptlang.org/docs/handbook/intro.html"),
            ("video", "TypeScript Full Course – freeCodeCamp", "https://www.youtube.com/watch?v=30LWjhZzg50"),
            ("course", "Total TypeScript – Free Fundamentals", "https://www.totaltypescript.com/tutorials"),
        ],
    ),
    (
        "Node.js",
        &[
            ("docs", "Node.js Docs (Learn)", "https://nodejs.org/en/learn"),
            ("video", "Node.js Crash Course – Traversy Media", "https://www.youtube.com/watch?v=fBNz5xF-Kx4"),
            (
                "course",
                "The Odin Project – NodeJS",
                "https://www.theodinproject.com/paths/full-stack-javascript/courses/nodejs",
            ),
        ],
    ),
    (
        "TailwindCSS",
        &[
            ("docs", "TailwindCSS Docs", "https://tailwindcss.com/docs/utility-first"),
            ("video", "Tailwind From Scratch – Traversy Media", "https://www.youtube.com/watch?v=dFgzHOX84xQ"),
            (
                "video",
                "Tailwind CSS Course – Net Ninja",
                "https://www.youtube.com/playlist?list=PL4cUxeGkcC9itC4TxYMzFCfS08S0CFgls",
            ),
        ],
    ),
    (
        "CSS",
        &[
            ("docs", "MDN – Learn CSS", "https://developer.mozilla.org/en-US/docs/Learn/CSS"),
            ("video", "CSS Grid Tutorial – Web Dev Simplified", "https://www.youtube.com/watch?v=9zBsdzdE4sM"),
            ("video", "Flexbox in 15 Minutes – Web Dev Simplified", "https://www.youtube.com/watch?v=fYq5PXgSsbE"),
        ],
    ),
    (
        "Markdown",
        &[
            ("docs", "Markdown Guide – Basic Syntax", "https://www.markdownguide.org/basic-syntax/"),
            ("docs", "GitHub Flavored Markdown Spec", "https://github.github.com/gfm/"),
        ],
    ),
    (
        "JavaScript",
        &[
            (
                "docs",
                "JavaScript Guide – MDN",
                "https://developer.mozilla.org/en-US/docs/Web/JavaScript/Guide",
            ),
            ("video", "JavaScript Crash Course – Traversy Media", "https://www.youtube.com/watch?v=hdI2bqOjy3c"),
        ],
    ),
];

const CONCEPT_LINKS: &[(&str, &str)] = &[
    ("React Components", "https://react.dev/learn/describing-the-ui"),
    ("Props and State", "https://react.dev/learn/state-a-components-memory"),
    ("Hooks", "https://react.dev/learn/hooks"),
    ("Component Composition", "https://react.dev/learn/passing-props-to-a-component"),
    ("Next.js Routing", "https://nextjs.org/docs/app/building-your-application/routing"),
    (
        "Next.js Data Fetching",
        "https://nextjs.org/docs/app/building-your-application/data-fetching/fetching",
    ),
    (
        "Next.js Rendering (SSR/SSG)",
        "https://nextjs.org/docs/app/building-your-application/rendering",
    ),
    (
        "TypeScript Types and Interfaces",
        "https://www.typescriptlang.org/docs/handbook/2/everyday-types.html",
    ),
    ("Generics", "https://www.typescriptlang.org/docs/handbook/2/generics.html"),
    ("Tailwind Utility-First Styling", "https://tailwindcss.com/docs/utility-first"),
    ("Tailwind Configuration", "https://tailwindcss.com/docs/configuration"),
    (
        "CSS Flexbox",
        "https://developer.mozilla.org/en-US/docs/Web/CSS/CSS_flexible_box_layout/Basic_concepts_of_flexbox",
    ),
    ("CSS Grid", "https://developer.mozilla.org/en-US/docs/Web/CSS/CSS_grid_layout"),
    ("Express Middleware", "https://expressjs.com/en/guide/using-middleware.html"),
    ("REST API Design", "https://www.ics.uci.edu/~fielding/pubs/dissertation/top.htm"),
    ("Repository Overview", "https://opensource.guide/how-to-contribute/#introduction"),
    ("Getting Started", "https://docs.github.com/en/get-started"),
    (
        "Contributing",
        "https://docs.github.com/en/get-started/quickstart/contributing-to-projects",
    ),
];

fn lookup(catalog: Catalog, technology: &str) -> Option<Vec<LearningItem>> {
    catalog
        .iter()
        .find(|(tech, _)| *tech == technology)
        .map(|(_, items)| {
            items
                .iter()
                .map(|(kind, title, url)| LearningItem::new(kind, title, url))
                .collect()
        })
}

/// Catalog entries for a comma-separated technology list; unknown names
/// are skipped.
///
/// # Example
/// ```
/// use openhub::learn::resources::resources_for;
///
/// let found = resources_for("React, Elixir,,TypeScript");
/// assert_eq!(found.len(), 2);
/// assert_eq!(found[1].technology, "TypeScript");
/// ```
pub fn resources_for(technologies: &str) -> Vec<TechnologyResources> {
    technologies
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .filter_map(|tech| {
            lookup(RESOURCES, tech).map(|items| TechnologyResources {
                technology: tech.to_string(),
                items,
            })
        })
        .collect()
}

/// Contextual catalog items for one technology.
pub fn curated_for(technology: &str) -> Vec<LearningItem> {
    lookup(CONTEXTUAL, technology).unwrap_or_default()
}

/// Documentation link for a concept.
pub fn concept_doc_link(concept: &str) -> Option<&'static str> {
    CONCEPT_LINKS
        .iter()
        .find(|(name, _)| *name == concept)
        .map(|(_, url)| *url)
}

fn regex(pattern: &str) -> Regex {
    Regex::new(pattern).expect("valid concept regex")
}

struct ConceptRule {
    matches: fn(&str) -> bool,
    concepts: &'static [&'static str],
}

static README: LazyLock<Regex> = LazyLock::new(|| regex(r"(^|/)readme\.md$"));
static COMPONENTS: LazyLock<Regex> = LazyLock::new(|| regex(r"[\\/]components?[\\/]"));
static JSX: LazyLock<Regex> = LazyLock::new(|| regex(r"\.(jsx|tsx)$"));
static NEXT_CONFIG: LazyLock<Regex> = LazyLock::new(|| regex(r"next\.config\.(js|mjs|ts)$"));
static APP_OR_PAGES: LazyLock<Regex> = LazyLock::new(|| regex(r"[\\/](app|pages)[\\/]"));
static TYPESCRIPT: LazyLock<Regex> = LazyLock::new(|| regex(r"\.(ts|tsx)$"));
static TAILWIND_CONFIG: LazyLock<Regex> =
    LazyLock::new(|| regex(r"tailwind\.config\.(js|ts)$"));
static STYLESHEET: LazyLock<Regex> = LazyLock::new(|| regex(r"\.(css|scss)$"));
static SCRIPT: LazyLock<Regex> = LazyLock::new(|| regex(r"\.(js|mjs|cjs)$"));
static SERVER_DIR: LazyLock<Regex> = LazyLock::new(|| regex(r"[\\/]server|backend|api[\\/]"));

const CONCEPT_RULES: &[ConceptRule] = &[
    ConceptRule {
        matches: |p| README.is_match(p),
        concepts: &["Repository Overview", "Getting Started", "Contributing"],
    },
    ConceptRule {
        matches: |p| COMPONENTS.is_match(p) || JSX.is_match(p),
        concepts: &[
            "React Components",
            "Props and State",
            "Hooks",
            "Component Composition",
        ],
    },
    ConceptRule {
        matches: |p| NEXT_CONFIG.is_match(p) || APP_OR_PAGES.is_match(p),
        concepts: &[
            "Next.js Routing",
            "Next.js Data Fetching",
            "Next.js Rendering (SSR/SSG)",
        ],
    },
    ConceptRule {
        matches: |p| TYPESCRIPT.is_match(p),
        concepts: &["TypeScript Types and Interfaces", "Generics"],
    },
    ConceptRule {
        matches: |p| TAILWIND_CONFIG.is_match(p),
        concepts: &["Tailwind Utility-First Styling", "Tailwind Configuration"],
    },
    ConceptRule {
        matches: |p| STYLESHEET.is_match(p),
        concepts: &["CSS Flexbox", "CSS Grid"],
    },
    ConceptRule {
        matches: |p| SCRIPT.is_match(p) && SERVER_DIR.is_match(p),
        concepts: &["Express Middleware", "REST API Design"],
    },
];

/// Concepts a file path suggests, in rule order without duplicates.
pub fn derive_concepts(path: &str) -> Vec<&'static str> {
    let lower = path.to_lowercase();
    let mut concepts: Vec<&'static str> = Vec::new();
    for rule in CONCEPT_RULES.iter().filter(|r| (r.matches)(&lower)) {
        for concept in rule.concepts {
            if !concepts.contains(concept) {
                concepts.push(concept);
            }
        }
    }
    concepts
}

/// Search keywords for a path: the file stem plus a technology hint.
pub fn derive_keywords(path: &str) -> String {
    let base = Path::new(path)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let (stem, ext) = match base.rfind('.') {
        Some(i) if i > 0 => (&base[..i], base[i..].to_lowercase()),
        _ => (base.as_str(), String::new()),
    };
    let tech = match ext.as_str() {
        ".jsx" => "React",
        ".tsx" => "React TypeScript",
        ".js" => "JavaScript",
        ".ts" => "TypeScript",
        ".css" => "CSS",
        ".scss" => "Sass",
        ".md" => "Markdown",
        ".py" => "Python",
        ".go" => "Go",
        ".rs" => "Rust",
        ".java" => "Java",
        ".rb" => "Ruby",
        ".php" => "PHP",
        _ => "",
    };

    let keywords = [stem, tech]
        .iter()
        .filter(|s| !s.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(" ");
    if keywords.is_empty() {
        "software development".to_string()
    } else {
        keywords
    }
}

/// Curated technology items followed by concept doc links for a path.
pub fn curated_items(path: &str) -> Vec<LearningItem> {
    let mut items: Vec<LearningItem> = detect_technologies(path)
        .iter()
        .flat_map(|tech| curated_for(tech))
        .collect();
    items.extend(derive_concepts(path).into_iter().filter_map(|concept| {
        concept_doc_link(concept).map(|url| LearningItem::new("docs", concept, url))
    }));
    items
}

/// Drops repeated `type|title|url` triples, keeping the first.
pub fn unique_items(items: Vec<LearningItem>) -> Vec<LearningItem> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(format!("{}|{}|{}", item.kind, item.title, item.url)))
        .collect()
}
