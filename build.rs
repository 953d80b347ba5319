use std::path::Path;

const ENZYME_DB: &str = "data/enzymes.enz";

fn main() {
    validate_enzyme_file(Path::new(ENZYME_DB));
    set_build_dependencies();
}

fn validate_enzyme_file(db_path: &Path) {
    // Ensure the enzyme database exists at build time
    assert!(
        db_path.exists(),
        "\n\nENZYME DATABASE BUILD ERROR: File not found\n\
         Path: {}\n\
         Please create the enzyme database before building.\n",
        db_path.display()
    );

    let contents = std::fs::read_to_string(db_path).unwrap_or_else(|e| {
        panic!(
            "\n\nENZYME DATABASE BUILD ERROR: Failed to read file\n\
             Path: {}\n\
             Error: {e}\n",
            db_path.display()
        );
    });

    let mut enzymes = 0;
    for (idx, line) in contents.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        validate_record(line, idx + 1);
        enzymes += 1;
    }

    assert!(
        enzymes > 0,
        "\n\nENZYME DATABASE BUILD ERROR: No enzyme records in {}\n",
        db_path.display()
    );

    println!("cargo:warning=Validated enzyme database: {enzymes} enzymes");
}

fn validate_record(line: &str, line_num: usize) {
    let fields: Vec<&str> = line.split('\t').collect();
    assert!(
        fields.len() >= 9,
        "\n\nENZYME DATABASE BUILD ERROR: Line {line_num} has {} fields, expected at least 9\n\
         Hint: Fields must be separated by tabs.\n",
        fields.len()
    );

    let name = fields[0];
    let site = fields[1];
    assert!(
        !site.is_empty() && site.bytes().all(|b| b"ACGTUMRWSYKVHDBN".contains(&b)),
        "\n\nENZYME DATABASE BUILD ERROR: Enzyme '{name}' (line {line_num}) has invalid site '{site}'\n"
    );

    let length: usize = parse_number(fields[2], name, "length", line_num);
    assert!(
        length == site.len(),
        "\n\nENZYME DATABASE BUILD ERROR: Enzyme '{name}' (line {line_num}) length {length} \
         does not match site '{site}'\n"
    );

    let ncuts: usize = parse_number(fields[3], name, "cut count", line_num);
    assert!(
        ncuts == 2 || ncuts == 4,
        "\n\nENZYME DATABASE BUILD ERROR: Enzyme '{name}' (line {line_num}) has {ncuts} cuts, \
         expected 2 or 4\n"
    );

    let blunt: u8 = parse_number(fields[4], name, "blunt flag", line_num);
    let cuts: Vec<i64> = fields[5..5 + ncuts]
        .iter()
        .map(|f| parse_number(f, name, "cut offset", line_num))
        .collect();
    let is_blunt = cuts.chunks(2).all(|pair| pair[0] == pair[1]);
    assert!(
        (blunt == 1) == is_blunt,
        "\n\nENZYME DATABASE BUILD ERROR: Enzyme '{name}' (line {line_num}) blunt flag {blunt} \
         contradicts cuts {cuts:?}\n"
    );
}

fn parse_number<T: std::str::FromStr>(value: &str, name: &str, field: &str, line_num: usize) -> T {
    value.trim().parse().unwrap_or_else(|_| {
        panic!(
            "\n\nENZYME DATABASE BUILD ERROR: Enzyme '{name}' (line {line_num}) has invalid \
             {field} '{value}'\n"
        )
    })
}

fn set_build_dependencies() {
    // Tell cargo to rerun if the enzyme database changes
    println!("cargo:rerun-if-changed={ENZYME_DB}");

    // Tell cargo to rerun if build.rs changes
    println!("cargo:rerun-if-changed=build.rs");
}
