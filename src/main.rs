extern crate avl_collections;
extern crate log;
extern crate simplelog;

use avl_collections::avl_tree::AvlTree;
use log::LevelFilter;
use simplelog::SimpleLogger;
use std::env;
use std::io::{self, BufRead};

fn parse_key(arg: Option<&str>) -> Option<i64> {
    arg.and_then(|arg| arg.parse().ok())
}

fn main() {
    let level = match env::var("AVL_LOG").as_ref().map(String::as_str) {
        Ok("trace") => LevelFilter::Trace,
        Ok("debug") => LevelFilter::Debug,
        _ => LevelFilter::Warn,
    };
    if SimpleLogger::init(level, simplelog::Config::default()).is_err() {
        eprintln!("Error: could not install logger.");
    }

    let mut tree: AvlTree<i64> = AvlTree::new();
    let input = io::stdin();

    for line in input.lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(_) => break,
        };
        let mut args = line.split_whitespace();
        match args.next() {
            Some("insert") => match parse_key(args.next()) {
                Some(key) => {
                    if let Err(err) = tree.insert(key) {
                        println!("Error: {}", err);
                    }
                },
                None => println!("usage: insert <key>"),
            },
            Some("delete") => match parse_key(args.next()) {
                Some(key) => {
                    if let Err(err) = tree.delete(&key) {
                        println!("Error: {}", err);
                    }
                },
                None => println!("usage: delete <key>"),
            },
            Some("search") => match parse_key(args.next()) {
                Some(key) => match tree.search(&key) {
                    Some(node) => println!(
                        "Found {} at depth {} with balance factor {}",
                        node.key(),
                        node.depth(),
                        node.balance_factor(),
                    ),
                    None => println!("{} not found", key),
                },
                None => println!("usage: search <key>"),
            },
            Some("postorder") => println!("{}", tree.postorder()),
            Some("levelorder") => {
                tree.for_each_level(|depth, key| println!("Level: {} Data: {}", depth, key))
            },
            Some("size") => println!("{}", tree.size()),
            Some("height") => println!("{}", tree.height()),
            Some(command) => println!("unknown command: {}", command),
            None => {},
        }
    }
}
