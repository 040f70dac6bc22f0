fn main() -> Result<(), Box<dyn std::error::Error>> {
    rycode::cli::main()
}
