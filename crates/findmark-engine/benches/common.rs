// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
#[allow(dead_code)]
pub fn generate_page(sections: usize) -> String {
    let mut content = String::from("# Portfolio\n\n");
    for section in 0..sections {
        content.push_str(&format!("## Project {section}\n\n"));
        content.push_str(
            "Visual design, *party* posters and generative **art** for a festival.\n\n",
        );
        content.push_str("- Art direction\n- Smart ARTIFACT viewer\n- Party planner\n\n");
        content.push_str("```\nconst art = new Canvas();\n```\n\n");
    }
    content
}
