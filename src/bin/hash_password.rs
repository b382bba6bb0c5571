fn print_usage_and_exit() -> ! {
    eprintln!("Usage: hash-password <secret>");
    std::process::exit(1);
}

fn main() {
    let mut args = std::env::args().skip(1); // 跳过程序名

    let secret = args.next().unwrap_or_else(|| {
        eprintln!("Missing <secret>");
        print_usage_and_exit();
    });

    if args.next().is_some() {
        eprintln!("Too many arguments provided.");
        print_usage_and_exit();
    }

    match inkpost::auth::hash_secret(&secret) {
        // 输出可直接写入 ADMIN_PASSWORD_HASH
        Ok(hash) => println!("{hash}"),
        Err(e) => {
            eprintln!("Failed to hash secret: {e}");
            std::process::exit(1);
        }
    }
}
