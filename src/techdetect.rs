//! Technology detection from file paths.
//!
//! Two rule sets are applied in order: the file extension, then substrings
//! of the lower-cased path (manifests, tool configs, well-known docs).

use serde::Serialize;

/// Extension → technology. Extensions are matched case-sensitively.
const EXTENSION_TECHNOLOGIES: &[(&str, &str)] = &[
    (".js", "JavaScript"),
    (".jsx", "React"),
    (".ts", "TypeScript"),
    (".tsx", "React TypeScript"),
    (".css", "CSS"),
    (".scss", "Sass"),
    (".sass", "Sass"),
    (".py", "Python"),
    (".go", "Go"),
    (".rs", "Rust"),
    (".java", "Java"),
    (".rb", "Ruby"),
    (".php", "PHP"),
    (".c", "C"),
    (".cpp", "C++"),
    (".cs", "C#"),
    (".swift", "Swift"),
    (".kt", "Kotlin"),
    (".sql", "SQL"),
    (".sh", "Shell"),
    (".bat", "Batch"),
    (".ps1", "PowerShell"),
    (".yml", "YAML"),
    (".yaml", "YAML"),
    (".toml", "TOML"),
    (".json", "JSON"),
    (".xml", "XML"),
    (".svg", "SVG"),
    (".md", "Markdown"),
];

/// Lower-cased path substring → technology.
const FILENAME_TECHNOLOGIES: &[(&str, &str)] = &[
    ("package.json", "Node.js"),
    ("next.config", "Next.js"),
    ("tailwind.config", "TailwindCSS"),
    ("vite.config", "Vite"),
    ("webpack.config", "Webpack"),
    ("rollup.config", "Rollup"),
    ("tsconfig", "TypeScript"),
    ("dockerfile", "Docker"),
    ("docker-compose", "Docker Compose"),
    ("requirements.txt", "Python"),
    ("pyproject.toml", "Python"),
    ("cargo.toml", "Rust"),
    ("go.mod", "Go"),
    ("pom.xml", "Maven"),
    ("build.gradle", "Gradle"),
    ("gemfile", "Ruby"),
    ("composer.json", "Composer"),
    ("pnpm-lock.yaml", "pnpm"),
    ("yarn.lock", "Yarn"),
    ("package-lock.json", "npm"),
    (".gitignore", "Git"),
    (".env", "Environment"),
    ("readme", "Documentation"),
    ("license", "License"),
    ("changelog", "Changelog"),
    ("contributing", "Contributing"),
];

const BADGES: &[(&str, &str, &str)] = &[
    (".js", "JS", "yellow"),
    (".jsx", "React", "blue"),
    (".ts", "TS", "blue"),
    (".tsx", "React", "cyan"),
    (".md", "MD", "gray"),
    (".css", "CSS", "sky"),
    (".scss", "SCSS", "pink"),
    (".sass", "Sass", "pink"),
    (".html", "HTML", "orange"),
    (".py", "Python", "green"),
    (".go", "Go", "cyan"),
    (".rs", "Rust", "orange"),
    (".java", "Java", "red"),
    (".rb", "Ruby", "red"),
    (".php", "PHP", "purple"),
    (".c", "C", "blue"),
    (".cpp", "C++", "blue"),
    (".cs", "C#", "purple"),
    (".swift", "Swift", "orange"),
    (".kt", "Kotlin", "purple"),
    (".sql", "SQL", "blue"),
    (".sh", "Shell", "green"),
    (".bat", "Batch", "gray"),
    (".ps1", "PowerShell", "blue"),
    (".yml", "YAML", "gray"),
    (".yaml", "YAML", "gray"),
    (".toml", "TOML", "blue"),
    (".ini", "INI", "gray"),
    (".cfg", "Config", "gray"),
    (".conf", "Config", "gray"),
    (".lock", "Lock", "gray"),
    (".log", "Log", "gray"),
    (".txt", "Text", "gray"),
    (".json", "JSON", "yellow"),
    (".xml", "XML", "orange"),
    (".svg", "SVG", "green"),
    (".png", "Image", "blue"),
    (".jpg", "Image", "blue"),
    (".jpeg", "Image", "blue"),
    (".gif", "Image", "blue"),
    (".ico", "Icon", "blue"),
    (".woff", "Font", "purple"),
    (".woff2", "Font", "purple"),
    (".ttf", "Font", "purple"),
    (".eot", "Font", "purple"),
];

const TECHNOLOGY_COLORS: &[(&str, &str)] = &[
    ("JavaScript", "yellow"),
    ("React", "blue"),
    ("TypeScript", "blue"),
    ("React TypeScript", "cyan"),
    ("CSS", "sky"),
    ("Sass", "pink"),
    ("Python", "green"),
    ("Go", "cyan"),
    ("Rust", "orange"),
    ("Java", "red"),
    ("Ruby", "red"),
    ("PHP", "purple"),
    ("C", "blue"),
    ("C++", "blue"),
    ("C#", "purple"),
    ("Swift", "orange"),
    ("Kotlin", "purple"),
    ("SQL", "blue"),
    ("Shell", "green"),
    ("Batch", "gray"),
    ("PowerShell", "blue"),
    ("YAML", "gray"),
    ("TOML", "blue"),
    ("JSON", "yellow"),
    ("XML", "orange"),
    ("SVG", "green"),
    ("Markdown", "gray"),
    ("Node.js", "green"),
    ("Next.js", "black"),
    ("TailwindCSS", "cyan"),
    ("Vite", "yellow"),
    ("Webpack", "blue"),
    ("Rollup", "red"),
    ("Docker", "blue"),
    ("Docker Compose", "blue"),
    ("Maven", "orange"),
    ("Gradle", "green"),
    ("Composer", "yellow"),
    ("pnpm", "orange"),
    ("Yarn", "blue"),
    ("npm", "red"),
    ("Git", "orange"),
    ("Environment", "gray"),
    ("Documentation", "blue"),
    ("License", "gray"),
    ("Changelog", "gray"),
    ("Contributing", "green"),
];

/// A short label and colour for a file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Badge {
    pub label: &'static str,
    pub color: &'static str,
}

/// `.ext` including the dot, taken after the last `.` in the path.
fn extension(path: &str) -> Option<&str> {
    path.rfind('.').map(|i| &path[i..])
}

/// Technologies suggested by a file path, in rule order without duplicates.
///
/// # Example
/// ```
/// use openhub::techdetect::detect_technologies;
///
/// assert_eq!(detect_technologies("web/tsconfig.json"), vec!["JSON", "TypeScript"]);
/// assert_eq!(detect_technologies("src/App.tsx"), vec!["React TypeScript"]);
/// ```
pub fn detect_technologies(path: &str) -> Vec<String> {
    let mut technologies: Vec<String> = Vec::new();
    let mut add = |tech: &str| {
        if !technologies.iter().any(|t| t == tech) {
            technologies.push(tech.to_string());
        }
    };

    if let Some(ext) = extension(path) {
        for (_, tech) in EXTENSION_TECHNOLOGIES.iter().filter(|(e, _)| *e == ext) {
            add(*tech);
        }
    }

    let lower = path.to_lowercase();
    for (needle, tech) in FILENAME_TECHNOLOGIES {
        if lower.contains(*needle) {
            add(*tech);
        }
    }

    technologies
}

/// Badge for a file extension, if one is known.
pub fn extension_badge(path: &str) -> Option<Badge> {
    let ext = extension(path)?;
    BADGES
        .iter()
        .find(|(e, _, _)| *e == ext)
        .map(|(_, label, color)| Badge {
            label: *label,
            color: *color,
        })
}

/// Display colour for a technology name; `gray` when unknown.
pub fn technology_color(tech: &str) -> &'static str {
    TECHNOLOGY_COLORS
        .iter()
        .find(|(name, _)| *name == tech)
        .map(|(_, color)| *color)
        .unwrap_or("gray")
}
