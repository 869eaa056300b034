mod dependencies;
mod generics;
mod isolation;
mod round_trip;
