mod element_wise_ops;
mod misc;
