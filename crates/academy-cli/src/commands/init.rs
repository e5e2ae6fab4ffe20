//! The `academy init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    if std::path::Path::new("academy.toml").exists() {
        println!("academy.toml already exists, skipping.");
    } else {
        std::fs::write("academy.toml", SAMPLE_CONFIG)?;
        println!("Created academy.toml");
    }

    std::fs::create_dir_all("rosters")?;
    let example_path = std::path::Path::new("rosters/example.json");
    if example_path.exists() {
        println!("rosters/example.json already exists, skipping.");
    } else {
        std::fs::write(example_path, EXAMPLE_ROSTER)?;
        println!("Created rosters/example.json");
    }

    println!("\nNext steps:");
    println!("  1. Edit academy.toml with your organisation details");
    println!("  2. Run: academy sessions --roster rosters/example.json --from 2024-04-01 --to 2024-05-01");
    println!("  3. Run: academy report --roster rosters/example.json --from 2024-04-01 --to 2024-05-01 --summary");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# academy configuration

output_dir = "./academy-reports"
default_format = "text"
# seed = 42

coaching_description = "Archery coaching"
tournament_description = "Tournament Day"

[organisation]
name = "BAFL Foundation"
address = [
    "FLC/5 Siddhivinayak Vihars No 72/2E, Hadapsar,",
    "Pune, 411028 Maharashtra, India",
]
"#;

const EXAMPLE_ROSTER: &str = r#"{
  "students": [
    { "id": 1, "name": "Asha Patil" },
    { "id": 2, "name": "Ravi Kulkarni" },
    { "id": 3, "name": "Meera Joshi" },
    { "id": 4, "name": "Kabir Shinde" },
    { "id": 5, "name": "Isha Deshmukh" }
  ]
}
"#;
