fn main() -> Result<(), Box<dyn std::error::Error>> {
    crewterm::cli::main()
}
