use bot_commons::*;

fn main() {
    // A missing .env file is fine, the variables may come from elsewhere.
    let _ = dotenvy::dotenv();
    start_everything("warn,movie_link_bot=debug", movie_link_bot::entry());
}
