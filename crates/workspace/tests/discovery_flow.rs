use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;
use tempfile::tempdir;
use tourgen_analyzer::{GrammarRegistry, StructuralAnalyzer};
use tourgen_workspace::{
    build_structure, discover, is_noise_path, DiscoveryOptions, FsWorkspace, WorkspaceFiles,
};

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn seed(root: &Path) {
    write(root, "src/index.ts", "import { helper } from './helper';\nexport function start() {}\n");
    write(root, "src/helper.ts", "export class Helper {\n  run() {}\n}\n");
    write(root, "src/models/types.ts", "export interface User { id: string }\n");
    write(root, "scripts/deploy/upload.ts", "export async function upload() {}\n");
    write(root, "webpack.config.js", "module.exports = {};\n");
    write(root, "src/helper.test.ts", "test('x', () => {});\n");
    write(root, "src/__tests__/deep.ts", "export {}\n");
    write(root, "lib/vendor.min.js", "var a=1;\n");
    write(root, "types/global.d.ts", "declare const x: number;\n");
    write(root, "dist/index.js", "export {}\n");
    write(root, "node_modules/pkg/index.js", "export {}\n");
    write(root, "README.md", "# Demo\n");
}

#[tokio::test]
async fn unbounded_discovery_returns_every_clean_file() {
    let temp = tempdir().unwrap();
    seed(temp.path());
    let workspace = FsWorkspace::new(temp.path()).unwrap();

    let files = discover(&workspace, &DiscoveryOptions::default())
        .await
        .unwrap();

    assert_eq!(
        files,
        vec![
            "src/index.ts",
            "src/models/types.ts",
            "src/helper.ts",
            "scripts/deploy/upload.ts",
            "webpack.config.js",
        ]
    );
    assert!(files.iter().all(|f| !is_noise_path(f)));
}

#[tokio::test]
async fn bounded_discovery_truncates_after_scoring() {
    let temp = tempdir().unwrap();
    seed(temp.path());
    let workspace = FsWorkspace::new(temp.path()).unwrap();

    let options = DiscoveryOptions {
        limit: 2,
        ..Default::default()
    };
    let files = discover(&workspace, &options).await.unwrap();

    assert!(files.len() <= 2);
    assert_eq!(files[0], "src/index.ts");
    assert!(files.iter().all(|f| !is_noise_path(f)));
}

#[tokio::test]
async fn caller_excludes_apply() {
    let temp = tempdir().unwrap();
    seed(temp.path());
    let workspace = FsWorkspace::new(temp.path()).unwrap();

    let options = DiscoveryOptions {
        exclude_patterns: vec!["scripts/**".to_string(), "*.js".to_string()],
        ..Default::default()
    };
    let files = discover(&workspace, &options).await.unwrap();
    assert!(files.iter().all(|f| !f.starts_with("scripts/")));
    assert!(files.iter().all(|f| !f.ends_with(".js")));
}

#[tokio::test]
async fn structure_collects_entry_points_and_dependencies() {
    let temp = tempdir().unwrap();
    seed(temp.path());
    let workspace = FsWorkspace::new(temp.path()).unwrap();
    let grammars = GrammarRegistry::with_defaults();
    let analyzer = StructuralAnalyzer::new(&grammars);

    let files = vec![
        "src/index.ts".to_string(),
        "src/helper.ts".to_string(),
        "src/gone.ts".to_string(),
    ];
    let structure = build_structure(&workspace, &analyzer, &files).await;

    // unreadable file skipped, order preserved
    let analyzed: Vec<&str> = structure.files.iter().map(|f| f.file.as_str()).collect();
    assert_eq!(analyzed, vec!["src/index.ts", "src/helper.ts"]);
    assert!(structure.is_entry_point("src/index.ts"));
    assert_eq!(structure.entry_points.len(), 1);
    assert_eq!(
        structure.dependencies.get("src/index.ts"),
        Some(&vec!["./helper".to_string()])
    );
    assert_eq!(structure.root, workspace.root());

    let helper = structure.file("src/helper.ts").unwrap();
    assert_eq!(helper.elements[0].name, "Helper");
    assert_eq!(helper.elements[0].children[0].name, "run");
}
