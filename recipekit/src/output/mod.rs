pub use recipe_set::{merge_recipes, write_debug_artifacts, RecipeSet, CONFIG_FILE, RECIPES_FILE};

mod recipe_set;
