mod chunk_graph;
mod frame;
mod scheduler;
