//! Multi-stage Dockerfile rendering for a [`BuildRecipe`]

use crate::langs::BuildRecipe;

const WORKDIR: &str = "WORKDIR /function";

pub fn render(recipe: &BuildRecipe) -> String {
    let mut lines = Vec::new();

    if let Some(build_image) = &recipe.build_image {
        lines.push(format!("FROM {} as build-stage", build_image));
        lines.push(WORKDIR.to_string());
        lines.extend(recipe.build_stage.iter().cloned());
    }

    lines.push(format!("FROM {}", recipe.run_image));
    lines.push(WORKDIR.to_string());
    lines.extend(recipe.final_stage.iter().cloned());
    lines.push(format!("CMD [\"{}\"]", recipe.entrypoint.replace('"', "\\\"")));

    let mut dockerfile = lines.join("\n");
    dockerfile.push('\n');
    dockerfile
}
